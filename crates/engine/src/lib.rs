pub mod arbiter;
pub mod bitboard;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod move_gen;
pub mod position;
pub mod r#move;

pub use arbiter::MoveOutcome;
pub use bitboard::PositionSet;
pub use config::{Config, Flank, Formation};
pub use constants::{Piece, PieceKind, Player};
pub use error::{MoveError, ParseError, SetupError};
pub use game::{Game, GameStatus};
pub use position::Position;
pub use r#move::Move;
