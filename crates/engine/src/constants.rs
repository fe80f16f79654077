//! Constants used in the Janggi engine.

pub const ROWS: usize = 10;
pub const COLUMNS: usize = 9;
pub const SQUARES: usize = ROWS * COLUMNS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Red,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    General,
    Guard,
    Horse,
    Elephant,
    Chariot,
    Cannon,
    Soldier,
}

/// Stable handle for one piece over the whole game, captured or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) u8);

impl PieceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A piece identity as seen by a renderer: who owns it and what it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub owner: Player,
    pub kind: PieceKind,
}

impl Player {
    /// Get the opponent of the current player.
    pub fn opponent(self) -> Player {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    /// Gets the index for the per-player arrays (0 for Red, 1 for Blue).
    pub fn index(self) -> usize {
        match self {
            Player::Red => 0,
            Player::Blue => 1,
        }
    }

    /// Row step that moves a soldier of this player towards the enemy back rank.
    /// Red starts on rows 0-3 and advances down the board.
    pub fn forward(self) -> isize {
        match self {
            Player::Red => 1,
            Player::Blue => -1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::Red => "red",
            Player::Blue => "blue",
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::General,
        PieceKind::Guard,
        PieceKind::Horse,
        PieceKind::Elephant,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::General => "General",
            PieceKind::Guard => "Guard",
            PieceKind::Horse => "Horse",
            PieceKind::Elephant => "Elephant",
            PieceKind::Chariot => "Chariot",
            PieceKind::Cannon => "Cannon",
            PieceKind::Soldier => "Soldier",
        }
    }

    /// Lowercase layout letter for this kind.
    fn letter(self) -> char {
        match self {
            PieceKind::General => 'k',
            PieceKind::Guard => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        }
    }
}

// Layout character conversions. Red is lowercase, Blue uppercase.
impl Piece {
    pub fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }

    pub fn to_fen_char(self) -> char {
        let c = self.kind.letter();
        match self.owner {
            Player::Red => c,
            Player::Blue => c.to_ascii_uppercase(),
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::ALL
            .into_iter()
            .find(|kind| kind.letter() == c.to_ascii_lowercase())?;
        let owner = if c.is_ascii_uppercase() { Player::Blue } else { Player::Red };
        Some(Piece { owner, kind })
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.owner, self.kind.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_chars_distinguish_owner_and_kind() {
        for kind in PieceKind::ALL {
            for owner in [Player::Red, Player::Blue] {
                let piece = Piece::new(owner, kind);
                assert_eq!(Piece::from_fen_char(piece.to_fen_char()), Some(piece));
            }
        }
        assert_eq!(Piece::from_fen_char('x'), None);
        assert_eq!(Piece::from_fen_char('1'), None);
    }

    #[test]
    fn display_uses_owner_then_kind() {
        assert_eq!(Piece::new(Player::Blue, PieceKind::Cannon).to_string(), "blueCannon");
        assert_eq!(Player::Red.opponent(), Player::Blue);
    }
}
