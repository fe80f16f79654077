//! Board coordinates, fortress geometry and coordinate notation.

use crate::constants::{COLUMNS, Player, ROWS};
use crate::error::ParseError;
use std::fmt;
use std::str::FromStr;

/// A cell on the 10x9 board. Row 0 is red's back rank, column 0 is file `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Returns `None` when the coordinates fall outside the board.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < ROWS && col < COLUMNS {
            Some(Self { row: row as u8, col: col as u8 })
        } else {
            None
        }
    }

    pub fn from_index(sq: usize) -> Self {
        debug_assert!(sq < ROWS * COLUMNS);
        Self { row: (sq / COLUMNS) as u8, col: (sq % COLUMNS) as u8 }
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Row-major square index (0-89).
    pub fn index(self) -> usize {
        self.row() * COLUMNS + self.col()
    }

    /// The cell reached by stepping `(dr, dc)`, pruned at the board edge.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        let row = self.row as isize + dr;
        let col = self.col as isize + dc;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as usize, col as usize)
    }

    /// The player whose palace contains this cell, if any.
    pub fn fortress(self) -> Option<Player> {
        if !(3..=5).contains(&self.col) {
            return None;
        }
        match self.row {
            0..=2 => Some(Player::Red),
            7..=9 => Some(Player::Blue),
            _ => None,
        }
    }

    pub fn in_fortress_of(self, player: Player) -> bool {
        self.fortress() == Some(player)
    }

    /// Corners and centre of a palace: the only cells joined by diagonal lines.
    pub fn on_fortress_diagonal(self) -> bool {
        self.fortress().is_some() && (self.row + self.col) % 2 == if self.row < 5 { 1 } else { 0 }
    }

    /// The centre cell of `player`'s palace.
    pub fn fortress_center(player: Player) -> Self {
        match player {
            Player::Red => Self { row: 1, col: 4 },
            Player::Blue => Self { row: 8, col: 4 },
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row + 1)
    }
}

/// File letter followed by a rank number from 1 to 10, e.g. `c1` or `e10`.
impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let file = chars.next().ok_or_else(|| ParseError::Square(s.to_string()))?;
        if !('a'..='i').contains(&file) {
            return Err(ParseError::Square(s.to_string()));
        }
        let rank: usize = chars
            .as_str()
            .parse()
            .map_err(|_| ParseError::Square(s.to_string()))?;
        if rank == 0 {
            return Err(ParseError::Square(s.to_string()));
        }
        Position::new(rank - 1, (file as u8 - b'a') as usize).ok_or_else(|| ParseError::Square(s.to_string()))
    }
}
