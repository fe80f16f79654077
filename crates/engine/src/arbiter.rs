//! The move arbiter: validates and applies moves, detects check and checkmate.

use crate::bitboard::{Board, PositionSet};
use crate::constants::{Piece, Player};
use crate::error::MoveError;
use crate::game::{Game, GameStatus, Ply};
use crate::move_gen::legal_moves;
use crate::position::Position;
use crate::r#move::Move;
use log::{debug, info};

/// What an accepted move request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Passed,
    Played { captured: Option<Piece>, check: bool },
    /// The move checkmated the opponent and ended the game.
    Checkmate { captured: Option<Piece>, winner: Player },
}

/// Whether `player`'s general stands on a cell some enemy piece could move to.
pub fn in_check(board: &Board, player: Player) -> bool {
    let Some(general) = board.general_position(player) else {
        return true; // Should not happen
    };
    let defenders = board.positions_of(player);
    board
        .occupants_of(player.opponent())
        .any(|(from, occupant)| legal_moves(occupant.piece, from, board, defenders).contains(general))
}

impl Game {
    /// Cells the piece on `pos` could move to, ignoring self-check.
    /// Empty when `pos` holds no piece.
    pub fn legal_moves_from(&self, pos: Position) -> PositionSet {
        match self.board.piece_at(pos) {
            Some(piece) => legal_moves(piece, pos, &self.board, self.board.positions_of(piece.owner.opponent())),
            None => PositionSet::new(),
        }
    }

    /// [`Game::legal_moves_from`] minus moves that would expose the mover's general.
    pub fn safe_moves_from(&self, pos: Position) -> PositionSet {
        self.legal_moves_from(pos)
            .iter()
            .filter(|&to| !self.leaves_in_check(pos, to))
            .collect()
    }

    pub fn is_in_check(&self, player: Player) -> bool {
        in_check(&self.board, player)
    }

    /// In check, and no move of any piece of `player` gets out of it.
    pub fn is_checkmate(&self, player: Player) -> bool {
        self.is_in_check(player) && !self.has_escape(player)
    }

    /// Plays `from -> to` on a scratch copy of the board and tests the mover's
    /// general. The live game is untouched.
    fn leaves_in_check(&self, from: Position, to: Position) -> bool {
        let Some(mover) = self.board.piece_at(from) else {
            return false;
        };
        let mut scratch = self.board.clone();
        scratch.relocate(from, to);
        in_check(&scratch, mover.owner)
    }

    fn has_escape(&self, player: Player) -> bool {
        self.pieces(player)
            .any(|(from, _)| self.legal_moves_from(from).iter().any(|to| !self.leaves_in_check(from, to)))
    }

    pub fn play(&mut self, mv: Move) -> Result<MoveOutcome, MoveError> {
        self.apply_move(mv.from, mv.to)
    }

    /// Validates and applies a move request for the side to move.
    ///
    /// `from == to` passes the turn, which is only allowed when not in check.
    /// On success the turn goes to the other side, unless the move checkmated
    /// it, in which case the game ends with the mover as winner. A rejected
    /// request leaves the game exactly as it was.
    pub fn apply_move(&mut self, from: Position, to: Position) -> Result<MoveOutcome, MoveError> {
        let result = self.arbitrate(from, to);
        if let Err(err) = &result {
            debug!("rejected {from}{to} on {}'s turn: {err}", self.turn);
        }
        result
    }

    fn arbitrate(&mut self, from: Position, to: Position) -> Result<MoveOutcome, MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver);
        }
        let piece = self.board.piece_at(from).ok_or(MoveError::EmptySquare(from))?;
        let mover = piece.owner;
        if mover != self.turn {
            return Err(MoveError::WrongTurn { piece, turn: self.turn });
        }

        let ply = Ply { edit: None, turn: self.turn, status: self.status };

        if from == to {
            if self.is_in_check(mover) {
                return Err(MoveError::PassWhileInCheck);
            }
            self.history.push(ply);
            self.turn = mover.opponent();
            return Ok(MoveOutcome::Passed);
        }

        if !self.legal_moves_from(from).contains(to) {
            return Err(MoveError::IllegalDestination { from, to });
        }
        if self.leaves_in_check(from, to) {
            return Err(MoveError::LeavesGeneralInCheck);
        }

        let edit = self.commit(from, to);
        let captured = edit.captured.map(|capture| self.record(capture.id).piece);
        self.history.push(Ply { edit: Some(edit), ..ply });
        debug_assert_eq!(self.verify_integrity(), Ok(()));

        let opponent = mover.opponent();
        let check = self.is_in_check(opponent);
        if check && !self.has_escape(opponent) {
            self.status = GameStatus::won_by(mover);
            info!("{mover} checkmates {opponent} with {from}{to}");
            return Ok(MoveOutcome::Checkmate { captured, winner: mover });
        }

        self.turn = opponent;
        Ok(MoveOutcome::Played { captured, check })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PieceKind;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn play(game: &mut Game, from: &str, to: &str) -> Result<MoveOutcome, MoveError> {
        game.apply_move(pos(from), pos(to))
    }

    #[test]
    fn blue_moves_first() {
        let mut game = Game::new();
        let before = game.clone();
        assert_eq!(
            play(&mut game, "c1", "e3"),
            Err(MoveError::WrongTurn { piece: Piece::new(Player::Red, PieceKind::Horse), turn: Player::Blue })
        );
        assert_eq!(game, before);
        assert_eq!(play(&mut game, "a7", "b7"), Ok(MoveOutcome::Played { captured: None, check: false }));
        assert_eq!(game.turn(), Player::Red);
    }

    #[test]
    fn empty_origin_is_rejected() {
        let mut game = Game::new();
        assert_eq!(play(&mut game, "e5", "e6"), Err(MoveError::EmptySquare(pos("e5"))));
    }

    #[test]
    fn unreachable_destination_is_rejected() {
        let mut game = Game::new();
        let before = game.clone();
        assert_eq!(
            play(&mut game, "a7", "a5"),
            Err(MoveError::IllegalDestination { from: pos("a7"), to: pos("a5") })
        );
        assert_eq!(game, before);
    }

    #[test]
    fn pass_advances_the_turn_without_touching_the_board() {
        let mut game = Game::new();
        let board = game.board().clone();
        assert_eq!(play(&mut game, "e9", "e9"), Ok(MoveOutcome::Passed));
        assert_eq!(game.board(), &board);
        assert_eq!(game.turn(), Player::Red);
        assert_eq!(game.ply_count(), 1);
    }

    #[test]
    fn cannot_pass_in_check() {
        // Blue chariot on e5 checks the red general down the open e-file.
        let mut game = Game::from_fen("4k4/9/9/9/4R4/9/9/9/3K5/9 r").unwrap();
        assert!(game.is_in_check(Player::Red));
        let before = game.clone();
        assert_eq!(play(&mut game, "e1", "e1"), Err(MoveError::PassWhileInCheck));
        assert_eq!(game, before);
        assert_eq!(play(&mut game, "e1", "d1"), Ok(MoveOutcome::Played { captured: None, check: false }));
    }

    #[test]
    fn moving_into_check_is_rejected_and_leaves_no_trace() {
        // The red guard on e2 shields its general from the blue chariot.
        let mut game = Game::from_fen("4k4/4a4/9/9/4R4/9/9/9/3K5/9 r").unwrap();
        let before = game.clone();
        assert!(game.legal_moves_from(pos("e2")).contains(pos("d2")));
        assert_eq!(play(&mut game, "e2", "d2"), Err(MoveError::LeavesGeneralInCheck));
        assert_eq!(game, before);
        assert!(!game.safe_moves_from(pos("e2")).contains(pos("d2")));
        assert!(game.safe_moves_from(pos("e2")).contains(pos("e3")));
    }

    #[test]
    fn capture_detaches_the_piece() {
        let mut game = Game::from_fen("4k4/9/9/9/4c4/9/9/4R4/3K5/9 b").unwrap();
        let cannon = game.piece_id_at(pos("e5")).unwrap();
        let outcome = play(&mut game, "e8", "e5").unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Played { captured: Some(Piece::new(Player::Red, PieceKind::Cannon)), check: true }
        );
        assert_eq!(game.record(cannon).position, None);
        assert_eq!(game.pieces(Player::Red).count(), 1);
        assert_eq!(game.captured().count(), 1);
        assert!(game.is_in_check(Player::Red));
        assert!(!game.is_checkmate(Player::Red));
    }

    #[test]
    fn checkmate_ends_the_game_without_advancing_the_turn() {
        // Chariots on the d- and f-files cover the general's side steps.
        let mut game = Game::from_fen("4k4/9/R8/9/9/3R1R3/9/9/4K4/9 b").unwrap();
        assert!(!game.is_in_check(Player::Red));
        let outcome = play(&mut game, "a3", "e3").unwrap();
        assert_eq!(outcome, MoveOutcome::Checkmate { captured: None, winner: Player::Blue });
        assert_eq!(game.status(), GameStatus::BlueWon);
        assert_eq!(game.turn(), Player::Blue);
        assert!(game.is_checkmate(Player::Red));

        let after = game.clone();
        assert_eq!(play(&mut game, "e1", "e1"), Err(MoveError::GameOver));
        assert_eq!(play(&mut game, "e3", "e4"), Err(MoveError::GameOver));
        assert_eq!(game.undo(), Err(MoveError::GameOver));
        assert_eq!(game, after);
    }

    #[test]
    fn check_that_can_be_blocked_is_not_mate() {
        // Same net, but the red guard on f2 can step in front of the general.
        let mut game = Game::from_fen("4k4/5a3/R8/9/9/3R1R3/9/9/4K4/9 b").unwrap();
        let outcome = play(&mut game, "a3", "e3").unwrap();
        assert_eq!(outcome, MoveOutcome::Played { captured: None, check: true });
        assert_eq!(game.turn(), Player::Red);
        assert!(game.is_in_check(Player::Red));
        assert!(!game.is_checkmate(Player::Red));
        assert!(game.safe_moves_from(pos("f2")).contains(pos("e2")));
        assert_eq!(play(&mut game, "f2", "e2"), Ok(MoveOutcome::Played { captured: None, check: false }));
    }

    #[test]
    fn undo_restores_the_previous_state() {
        let mut game = Game::new();
        let start = game.clone();
        play(&mut game, "a7", "a6").unwrap();
        play(&mut game, "e2", "e2").unwrap();
        play(&mut game, "a6", "a5").unwrap();
        let before_capture = game.clone();
        play(&mut game, "a4", "a5").unwrap();
        assert_eq!(game.captured().count(), 1);

        game.undo().unwrap();
        assert_eq!(game, before_capture);
        game.undo().unwrap();
        game.undo().unwrap();
        game.undo().unwrap();
        assert_eq!(game, start);
    }
}
