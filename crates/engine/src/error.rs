//! Error types for move requests, game setup and notation parsing.

use crate::constants::{Piece, Player};
use crate::position::Position;
use thiserror::Error;

/// Why a move request was rejected. A rejection never changes the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,
    #[error("there is no piece on {0}")]
    EmptySquare(Position),
    #[error("{piece} cannot move on {turn}'s turn")]
    WrongTurn { piece: Piece, turn: Player },
    #[error("cannot pass while the general is in check")]
    PassWhileInCheck,
    #[error("{from} cannot move to {to}")]
    IllegalDestination { from: Position, to: Position },
    #[error("move would leave the general in check")]
    LeavesGeneralInCheck,
    #[error("no move to undo")]
    NothingToUndo,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("layout must have 10 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} does not describe exactly 9 cells")]
    RankWidth { rank: usize },
    #[error("unknown piece letter '{0}'")]
    UnknownPiece(char),
    #[error("side to move must be 'r' or 'b', found {0:?}")]
    SideToMove(String),
    #[error("{0} must have exactly one general, found {1}")]
    GeneralCount(Player, usize),
    #[error("{0} general is outside its fortress at {1}")]
    GeneralOutsideFortress(Player, Position),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid square {0:?}")]
    Square(String),
    #[error("invalid move {0:?}")]
    Move(String),
}

/// A broken internal invariant of the game aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("piece on {0} records a different position")]
    PositionMismatch(Position),
    #[error("piece on {0} is not in its owner's roster")]
    NotInRoster(Position),
    #[error("roster piece at {0:?} is not on the board")]
    OffBoard(Option<Position>),
    #[error("board bitboards disagree with its cells")]
    Bitboards,
}
