//! Game state: the board, both sides' live pieces, turn and result.

use crate::bitboard::{Board, Occupant};
use crate::config::Config;
use crate::constants::{COLUMNS, Piece, PieceId, PieceKind, Player, ROWS};
use crate::error::{IntegrityError, MoveError, SetupError};
use crate::position::Position;
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    RedWon,
    BlueWon,
}

impl GameStatus {
    pub fn won_by(player: Player) -> Self {
        match player {
            Player::Red => GameStatus::RedWon,
            Player::Blue => GameStatus::BlueWon,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::RedWon => Some(Player::Red),
            GameStatus::BlueWon => Some(Player::Blue),
        }
    }

    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// One piece over its lifetime. `position` is `None` once captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceRecord {
    pub piece: Piece,
    pub position: Option<Position>,
}

/// A captured piece and the roster slot it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Capture {
    pub id: PieceId,
    pub slot: usize,
}

/// Everything needed to reverse one committed move exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Edit {
    pub mover: PieceId,
    pub from: Position,
    pub to: Position,
    pub captured: Option<Capture>,
}

/// A history entry. `edit` is `None` for a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ply {
    pub edit: Option<Edit>,
    pub turn: Player,
    pub status: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub(crate) board: Board,
    pieces: Vec<PieceRecord>,
    rosters: [Vec<PieceId>; 2],
    captured: Vec<PieceId>,
    pub(crate) turn: Player,
    pub(crate) status: GameStatus,
    pub(crate) history: Vec<Ply>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// The standard starting position with blue to move.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let mut placements: Vec<(Position, Piece)> = Vec::with_capacity(32);
        for player in [Player::Red, Player::Blue] {
            // Rows counted from the player's own back rank.
            let rank = |n: usize| match player {
                Player::Red => n,
                Player::Blue => ROWS - 1 - n,
            };
            let mut setup: Vec<(usize, usize, PieceKind)> = Vec::with_capacity(16);
            for (col, kind) in config.formation(player).back_rank().into_iter().enumerate() {
                if let Some(kind) = kind {
                    setup.push((rank(0), col, kind));
                }
            }
            setup.push((rank(1), 4, PieceKind::General));
            setup.push((rank(2), 1, PieceKind::Cannon));
            setup.push((rank(2), 7, PieceKind::Cannon));
            for col in (0..COLUMNS).step_by(2) {
                setup.push((rank(3), col, PieceKind::Soldier));
            }
            placements.extend(
                setup
                    .into_iter()
                    .filter_map(|(row, col, kind)| Some((Position::new(row, col)?, Piece::new(player, kind)))),
            );
        }

        // Row-major, so ids match a game loaded from the equivalent layout string.
        placements.sort_by_key(|(pos, _)| pos.index());
        let mut game = Self::empty(config.first_player);
        for (pos, piece) in placements {
            game.add_piece(pos, piece);
        }
        game
    }

    fn empty(turn: Player) -> Self {
        Self {
            board: Board::new(),
            pieces: Vec::with_capacity(32),
            rosters: [Vec::with_capacity(16), Vec::with_capacity(16)],
            captured: Vec::new(),
            turn,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    fn add_piece(&mut self, pos: Position, piece: Piece) {
        let id = PieceId(self.pieces.len() as u8);
        self.pieces.push(PieceRecord { piece, position: Some(pos) });
        self.rosters[piece.owner.index()].push(id);
        self.board.place(pos, Occupant { id, piece });
    }

    /// Loads a layout such as
    /// `rbna1abnr/4k4/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/4K4/RBNA1ABNR b`.
    ///
    /// Ranks run from row 0 (file `a` first); digits count empty cells; red is
    /// lowercase and blue uppercase; the last field names the side to move.
    pub fn from_fen(fen: &str) -> Result<Self, SetupError> {
        let mut parts = fen.split_whitespace();
        let layout = parts.next().unwrap_or_default();
        let turn = match parts.next() {
            Some("r") => Player::Red,
            Some("b") => Player::Blue,
            other => return Err(SetupError::SideToMove(other.unwrap_or_default().to_string())),
        };

        let ranks: Vec<&str> = layout.split('/').collect();
        if ranks.len() != ROWS {
            return Err(SetupError::RankCount(ranks.len()));
        }

        let mut game = Self::empty(turn);
        for (row, rank) in ranks.into_iter().enumerate() {
            let mut col = 0;
            for ch in rank.chars() {
                if let Some(digit) = ch.to_digit(10) {
                    col += digit as usize;
                    continue;
                }
                let piece = Piece::from_fen_char(ch).ok_or(SetupError::UnknownPiece(ch))?;
                let pos = Position::new(row, col).ok_or(SetupError::RankWidth { rank: row + 1 })?;
                game.add_piece(pos, piece);
                col += 1;
            }
            if col != COLUMNS {
                return Err(SetupError::RankWidth { rank: row + 1 });
            }
        }

        for player in [Player::Red, Player::Blue] {
            let generals: Vec<Position> = game
                .pieces(player)
                .filter(|(_, piece)| piece.kind == PieceKind::General)
                .map(|(pos, _)| pos)
                .collect();
            match generals.as_slice() {
                [pos] if !pos.in_fortress_of(player) => {
                    return Err(SetupError::GeneralOutsideFortress(player, *pos));
                }
                [_] => {}
                _ => return Err(SetupError::GeneralCount(player, generals.len())),
            }
        }

        Ok(game)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(64);
        for r in 0..ROWS {
            let mut empty_count = 0;
            for c in 0..COLUMNS {
                let piece = Position::new(r, c).and_then(|pos| self.board.piece_at(pos));
                match piece {
                    None => empty_count += 1,
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if r + 1 < ROWS {
                fen.push('/');
            }
        }
        fen.push(' ');
        fen.push(match self.turn {
            Player::Red => 'r',
            Player::Blue => 'b',
        });
        fen
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.board.piece_at(pos)
    }

    pub fn piece_id_at(&self, pos: Position) -> Option<PieceId> {
        self.board.get(pos).map(|occupant| occupant.id)
    }

    pub fn record(&self, id: PieceId) -> &PieceRecord {
        &self.pieces[id.index()]
    }

    /// Live pieces of `player` with their positions.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.rosters[player.index()].iter().filter_map(|id| {
            let record = &self.pieces[id.index()];
            record.position.map(|pos| (pos, record.piece))
        })
    }

    /// Pieces taken off the board, oldest capture first.
    pub fn captured(&self) -> impl Iterator<Item = Piece> + '_ {
        self.captured.iter().map(|id| self.pieces[id.index()].piece)
    }

    pub fn general_position(&self, player: Player) -> Option<Position> {
        self.pieces(player)
            .find(|(_, piece)| piece.kind == PieceKind::General)
            .map(|(pos, _)| pos)
    }

    /// Number of moves and passes played so far.
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    /// Moves the piece on `from` to `to`, detaching whatever stood on `to`.
    /// The caller has already validated the move.
    pub(crate) fn commit(&mut self, from: Position, to: Position) -> Edit {
        let Some(mover) = self.board.get(from) else {
            panic!("commit from empty cell {from}");
        };
        let captured = self.board.relocate(from, to).map(|victim| {
            let roster = &mut self.rosters[victim.piece.owner.index()];
            let Some(slot) = roster.iter().position(|&id| id == victim.id) else {
                panic!("captured {} on {to} is missing from its roster", victim.piece);
            };
            roster.remove(slot);
            self.pieces[victim.id.index()].position = None;
            self.captured.push(victim.id);
            Capture { id: victim.id, slot }
        });

        let record = &mut self.pieces[mover.id.index()];
        assert_eq!(record.position, Some(from), "{} is not where the board says", record.piece);
        record.position = Some(to);

        trace!("{} {from} -> {to}, captured {:?}", mover.piece, captured.map(|c| self.pieces[c.id.index()].piece));
        Edit { mover: mover.id, from, to, captured }
    }

    /// Exact inverse of [`Game::commit`].
    pub(crate) fn revert(&mut self, edit: Edit) {
        self.board.relocate(edit.to, edit.from);
        self.pieces[edit.mover.index()].position = Some(edit.from);

        if let Some(capture) = edit.captured {
            let record = &mut self.pieces[capture.id.index()];
            record.position = Some(edit.to);
            let piece = record.piece;
            self.rosters[piece.owner.index()].insert(capture.slot, capture.id);
            self.board.place(edit.to, Occupant { id: capture.id, piece });
            let popped = self.captured.pop();
            debug_assert_eq!(popped, Some(capture.id));
        }
    }

    /// Takes back the last move or pass. Not allowed once the game has ended.
    pub fn undo(&mut self) -> Result<(), MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver);
        }
        let ply = self.history.pop().ok_or(MoveError::NothingToUndo)?;
        if let Some(edit) = ply.edit {
            self.revert(edit);
        }
        self.turn = ply.turn;
        self.status = ply.status;
        Ok(())
    }

    /// Checks that the board, the rosters and every piece record agree.
    pub fn verify_integrity(&self) -> Result<(), IntegrityError> {
        if !self.board.bitboards_consistent() {
            return Err(IntegrityError::Bitboards);
        }
        for player in [Player::Red, Player::Blue] {
            for (pos, occupant) in self.board.occupants_of(player) {
                if self.pieces[occupant.id.index()].position != Some(pos) {
                    return Err(IntegrityError::PositionMismatch(pos));
                }
                if !self.rosters[player.index()].contains(&occupant.id) {
                    return Err(IntegrityError::NotInRoster(pos));
                }
            }
            for id in &self.rosters[player.index()] {
                let position = self.pieces[id.index()].position;
                let on_board = position.and_then(|pos| self.board.get(pos)).map(|occupant| occupant.id);
                if on_board != Some(*id) {
                    return Err(IntegrityError::OffBoard(position));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Flank, Formation};

    const INITIAL_FEN: &str = "rbna1abnr/4k4/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/4K4/RBNA1ABNR b";

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn initial_layout_matches_the_standard_setup() {
        let game = Game::new();
        assert_eq!(game.to_fen(), INITIAL_FEN);
        assert_eq!(game.turn(), Player::Blue);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.pieces(Player::Red).count(), 16);
        assert_eq!(game.pieces(Player::Blue).count(), 16);
        assert_eq!(game.piece_at(pos("c1")), Some(Piece::new(Player::Red, PieceKind::Horse)));
        assert_eq!(game.piece_at(pos("b10")), Some(Piece::new(Player::Blue, PieceKind::Elephant)));
        assert_eq!(game.general_position(Player::Blue), Some(pos("e9")));
        assert!(game.verify_integrity().is_ok());
    }

    #[test]
    fn formations_swap_horse_and_elephant() {
        let config = Config {
            red_formation: Formation { left: Flank::HorseElephant, right: Flank::ElephantHorse },
            blue_formation: Formation { left: Flank::ElephantHorse, right: Flank::HorseElephant },
            ..Config::default()
        };
        let game = Game::with_config(&config);
        assert_eq!(game.to_fen().split('/').next(), Some("rnba1abnr"));
        assert_eq!(game.to_fen().split('/').last(), Some("RBNA1ANBR b"));
    }

    #[test]
    fn fen_round_trips_custom_positions() {
        let fen = "4k4/9/9/9/4c4/9/9/9/3RK4/9 r";
        let game = Game::from_fen(fen).unwrap();
        assert_eq!(game.to_fen(), fen);
        assert_eq!(game.turn(), Player::Red);
        assert_eq!(Game::from_fen(INITIAL_FEN).unwrap(), Game::new());
    }

    #[test]
    fn fen_validation() {
        assert_eq!(Game::from_fen("4k4/9 r"), Err(SetupError::RankCount(2)));
        assert_eq!(
            Game::from_fen("4k4/9/9/9/9/9/9/9/4K4/8 r"),
            Err(SetupError::RankWidth { rank: 10 })
        );
        assert_eq!(
            Game::from_fen("4k4/9/9/9/9/9/9/9/4K4/9x r").unwrap_err(),
            SetupError::UnknownPiece('x')
        );
        assert_eq!(
            Game::from_fen("4k4/9/9/9/9/9/9/9/4K4/9 w"),
            Err(SetupError::SideToMove("w".to_string()))
        );
        assert_eq!(
            Game::from_fen("9/9/9/9/9/9/9/9/4K4/9 r"),
            Err(SetupError::GeneralCount(Player::Red, 0))
        );
        assert_eq!(
            Game::from_fen("4k4/9/9/4k4/9/9/9/9/4K4/9 r"),
            Err(SetupError::GeneralCount(Player::Red, 2))
        );
        assert_eq!(
            Game::from_fen("4k4/9/9/9/9/9/9/9/9/K8 b"),
            Err(SetupError::GeneralOutsideFortress(Player::Blue, pos("a10")))
        );
    }

    #[test]
    fn commit_then_revert_restores_everything() {
        let mut game = Game::from_fen("4k4/9/9/9/4c4/9/9/4R4/4K4/9 b").unwrap();
        let before = game.clone();

        let edit = game.commit(pos("e8"), pos("e5"));
        assert_eq!(game.captured().collect::<Vec<_>>(), vec![Piece::new(Player::Red, PieceKind::Cannon)]);
        assert_eq!(game.pieces(Player::Red).count(), 1);
        assert!(game.verify_integrity().is_ok());

        game.revert(edit);
        assert_eq!(game, before);
    }

    #[test]
    fn revert_restores_the_roster_slot() {
        let mut game = Game::new();
        let before = game.clone();
        // The blue soldier on e7 sits mid-roster.
        let edit = game.commit(pos("a1"), pos("e7"));
        assert!(edit.captured.unwrap().slot > 0);
        assert!(game.verify_integrity().is_ok());
        game.revert(edit);
        assert_eq!(game, before);
    }

    #[test]
    fn undo_rejects_empty_history() {
        let mut game = Game::new();
        assert_eq!(game.undo(), Err(MoveError::NothingToUndo));
    }
}
