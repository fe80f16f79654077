//! The Textual User Interface for two players sharing one terminal.

use crossterm::style::{StyledContent, Stylize};
use janggi_engine::constants::{COLUMNS, ROWS};
use janggi_engine::{Game, MoveError, MoveOutcome, Player, Position, PositionSet};
use log::warn;
use std::io::{self, BufRead, Write};

enum Command {
    Move(janggi_engine::Move),
    Pass,
    Undo,
    Moves(Position),
    Fen,
    Help,
    Exit,
}

fn parse_command(input: &str) -> Option<Command> {
    let mut words = input.split_whitespace();
    let command = match (words.next()?, words.next()) {
        ("exit" | "quit", None) => Command::Exit,
        ("pass", None) => Command::Pass,
        ("undo", None) => Command::Undo,
        ("fen", None) => Command::Fen,
        ("help", None) => Command::Help,
        ("moves", Some(square)) => Command::Moves(square.parse().ok()?),
        _ => Command::Move(input.parse().ok()?),
    };
    Some(command)
}

/// Runs the main game loop for the text-based UI.
pub fn run() -> io::Result<()> {
    let mut game = Game::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("--- Janggi in Rust ---");
    print_help();

    loop {
        println!();
        print!("{}", render(&game, PositionSet::new()));

        if let Some(winner) = game.status().winner() {
            println!("Checkmate! {} wins.", paint(winner, winner.name()));
            break;
        }
        if game.is_in_check(game.turn()) {
            println!("{} is in check.", paint(game.turn(), game.turn().name()));
        }

        print!("{} to move: ", paint(game.turn(), game.turn().name()));
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let Some(command) = parse_command(input.trim()) else {
            println!("Unrecognized input. Type 'help' for commands.");
            continue;
        };

        match command {
            Command::Exit => break,
            Command::Help => print_help(),
            Command::Fen => println!("{}", game.to_fen()),
            Command::Undo => {
                if let Err(err) = game.undo() {
                    println!("Cannot undo: {err}.");
                }
            }
            Command::Moves(pos) => match game.piece_at(pos) {
                Some(piece) => {
                    let moves = game.safe_moves_from(pos);
                    println!("{piece} on {pos} can move to: {}", list(moves));
                    print!("{}", render(&game, moves));
                }
                None => println!("There is no piece on {pos}."),
            },
            Command::Pass => match game.general_position(game.turn()) {
                Some(general) => report(game.apply_move(general, general)),
                None => warn!("{} has no general on the board", game.turn()),
            },
            Command::Move(mv) => report(game.play(mv)),
        }
    }

    Ok(())
}

fn report(result: Result<MoveOutcome, MoveError>) {
    match result {
        Ok(MoveOutcome::Passed) => println!("Turn passed."),
        Ok(MoveOutcome::Played { captured, check }) => {
            if let Some(piece) = captured {
                println!("Captured {piece}.");
            }
            if check {
                println!("Check!");
            }
        }
        Ok(MoveOutcome::Checkmate { captured: Some(piece), .. }) => println!("Captured {piece}."),
        Ok(MoveOutcome::Checkmate { .. }) => {}
        Err(err) => println!("Illegal move: {err}."),
    }
}

fn print_help() {
    println!("Enter moves as origin and destination (e.g. c1e3 or 'c1 e3').");
    println!("Other commands: pass, undo, moves <square>, fen, help, exit.");
}

fn list(moves: PositionSet) -> String {
    if moves.is_empty() {
        return "nowhere".to_string();
    }
    moves.iter().map(|pos| pos.to_string()).collect::<Vec<_>>().join(" ")
}

fn paint<T: std::fmt::Display + Stylize<Styled = StyledContent<T>>>(player: Player, text: T) -> StyledContent<T> {
    match player {
        Player::Red => text.red().bold(),
        Player::Blue => text.blue().bold(),
    }
}

/// Draws the board with rank 1 (red's back rank) on top. Cells in
/// `highlight` are marked with `*`, or shown reversed when occupied.
fn render(game: &Game, highlight: PositionSet) -> String {
    let mut out = String::new();
    out.push_str("    a b c d e f g h i\n");
    out.push_str("   +-----------------+\n");
    for row in 0..ROWS {
        out.push_str(&format!("{:>2} |", row + 1));
        for col in 0..COLUMNS {
            let Some(pos) = Position::new(row, col) else { continue };
            let cell = match game.piece_at(pos) {
                Some(piece) => {
                    let styled = paint(piece.owner, piece.to_fen_char());
                    if highlight.contains(pos) { styled.reverse().to_string() } else { styled.to_string() }
                }
                None if highlight.contains(pos) => "*".yellow().to_string(),
                None if pos.fortress().is_some() => "+".dark_grey().to_string(),
                None => ".".to_string(),
            };
            out.push_str(&cell);
            if col + 1 < COLUMNS {
                out.push(' ');
            }
        }
        out.push_str("|\n");
    }
    out.push_str("   +-----------------+\n");
    out
}
