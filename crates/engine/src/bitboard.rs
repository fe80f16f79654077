//! The board representation: a 10x9 occupancy grid backed by bitboards.

use crate::constants::{COLUMNS, Piece, PieceId, PieceKind, Player, ROWS, SQUARES};
use crate::position::Position;
use std::fmt;

// 90 cells fit in a u128.
pub type Bitboard = u128;

// --- Pre-computed Masks ---
pub const SQUARE_MASKS: [Bitboard; SQUARES] = {
    let mut masks = [0; SQUARES];
    let mut i = 0;
    while i < SQUARES {
        masks[i] = 1 << i;
        i += 1;
    }
    masks
};

/// A set of board cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PositionSet(Bitboard);

impl PositionSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn from_bitboard(bb: Bitboard) -> Self {
        Self(bb)
    }

    pub fn bitboard(self) -> Bitboard {
        self.0
    }

    pub fn insert(&mut self, pos: Position) {
        self.0 |= SQUARE_MASKS[pos.index()];
    }

    pub fn contains(self, pos: Position) -> bool {
        self.0 & SQUARE_MASKS[pos.index()] != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: PositionSet) -> PositionSet {
        Self(self.0 | other.0)
    }

    /// Cells in row-major order.
    pub fn iter(self) -> impl Iterator<Item = Position> {
        let mut bb = self.0;
        std::iter::from_fn(move || {
            if bb == 0 {
                return None;
            }
            let sq = bb.trailing_zeros() as usize;
            bb &= bb - 1;
            Some(Position::from_index(sq))
        })
    }
}

impl FromIterator<Position> for PositionSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut set = PositionSet::new();
        for pos in iter {
            set.insert(pos);
        }
        set
    }
}

/// What a board cell holds: the piece's identity plus its handle in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub id: PieceId,
    pub piece: Piece,
}

/// The 10x9 grid. Each cell holds at most one piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Occupant>; SQUARES],
    color_bitboards: [Bitboard; 2],
    cannon_bitboard: Bitboard,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [None; SQUARES],
            color_bitboards: [0; 2],
            cannon_bitboard: 0,
        }
    }

    pub fn get(&self, pos: Position) -> Option<Occupant> {
        self.cells[pos.index()]
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.get(pos).map(|occupant| occupant.piece)
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.cells[pos.index()].is_none()
    }

    pub fn occupied_bitboard(&self) -> Bitboard {
        self.color_bitboards[0] | self.color_bitboards[1]
    }

    pub fn player_bitboard(&self, player: Player) -> Bitboard {
        self.color_bitboards[player.index()]
    }

    pub fn cannon_bitboard(&self) -> Bitboard {
        self.cannon_bitboard
    }

    /// Cells held by `player`.
    pub fn positions_of(&self, player: Player) -> PositionSet {
        PositionSet::from_bitboard(self.player_bitboard(player))
    }

    /// Every piece of `player` still on the board, in row-major order.
    pub fn occupants_of(&self, player: Player) -> impl Iterator<Item = (Position, Occupant)> + '_ {
        self.positions_of(player)
            .iter()
            .filter_map(move |pos| self.get(pos).map(|occupant| (pos, occupant)))
    }

    pub fn general_position(&self, player: Player) -> Option<Position> {
        self.occupants_of(player)
            .find(|(_, occupant)| occupant.piece.kind == PieceKind::General)
            .map(|(pos, _)| pos)
    }

    /// Puts a piece on an empty cell.
    pub fn place(&mut self, pos: Position, occupant: Occupant) {
        let sq = pos.index();
        assert!(self.cells[sq].is_none(), "cell {pos} is already occupied");
        self.cells[sq] = Some(occupant);
        self.color_bitboards[occupant.piece.owner.index()] |= SQUARE_MASKS[sq];
        if occupant.piece.kind == PieceKind::Cannon {
            self.cannon_bitboard |= SQUARE_MASKS[sq];
        }
    }

    pub fn remove(&mut self, pos: Position) -> Option<Occupant> {
        let sq = pos.index();
        let occupant = self.cells[sq].take()?;
        self.color_bitboards[occupant.piece.owner.index()] &= !SQUARE_MASKS[sq];
        self.cannon_bitboard &= !SQUARE_MASKS[sq];
        Some(occupant)
    }

    /// Moves whatever is on `from` to `to`, returning the piece displaced from `to`.
    pub fn relocate(&mut self, from: Position, to: Position) -> Option<Occupant> {
        let mover = self.remove(from)?;
        let captured = self.remove(to);
        self.place(to, mover);
        captured
    }

    /// Recomputes the bitboards from the cells and compares.
    pub fn bitboards_consistent(&self) -> bool {
        let mut colors = [0; 2];
        let mut cannons = 0;
        for (sq, cell) in self.cells.iter().enumerate() {
            if let Some(occupant) = cell {
                colors[occupant.piece.owner.index()] |= SQUARE_MASKS[sq];
                if occupant.piece.kind == PieceKind::Cannon {
                    cannons |= SQUARE_MASKS[sq];
                }
            }
        }
        colors == self.color_bitboards && cannons == self.cannon_bitboard
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "    a b c d e f g h i")?;
        writeln!(f, "   +-----------------+")?;
        for r in 0..ROWS {
            write!(f, "{:>2} |", r + 1)?;
            for c in 0..COLUMNS {
                let sq = r * COLUMNS + c;
                let ch = self.cells[sq].map_or('.', |occupant| occupant.piece.to_fen_char());
                if c + 1 < COLUMNS {
                    write!(f, "{ch} ")?;
                } else {
                    write!(f, "{ch}")?;
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "   +-----------------+")
    }
}
