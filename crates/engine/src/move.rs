//! Defines the representation of a move in the engine.

use crate::error::ParseError;
use crate::position::Position;
use std::fmt;
use std::str::FromStr;

/// A move request. Origin equal to destination is a turn pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    pub fn is_pass(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Accepts `c1e3`, `a10a9` or `c1 e3`.
impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut parts = s.split_whitespace();
        let (from, to) = match (parts.next(), parts.next(), parts.next()) {
            (Some(from), Some(to), None) => (from, to),
            (Some(joined), None, None) => {
                let split = joined
                    .char_indices()
                    .skip(1)
                    .find(|(_, c)| c.is_ascii_alphabetic())
                    .map(|(i, _)| i)
                    .ok_or_else(|| ParseError::Move(s.to_string()))?;
                joined.split_at(split)
            }
            _ => return Err(ParseError::Move(s.to_string())),
        };
        let from = from.parse().map_err(|_| ParseError::Move(s.to_string()))?;
        let to = to.parse().map_err(|_| ParseError::Move(s.to_string()))?;
        Ok(Move { from, to })
    }
}
