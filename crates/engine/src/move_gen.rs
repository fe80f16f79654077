//! Move generation logic, including pre-computed step tables.
//!
//! Every piece kind is described by a [`Rule`]: which cells it may reach from
//! a square is read from tables built once at start-up, and the board is only
//! consulted for blocking and capture decisions.

use crate::bitboard::{Bitboard, Board, PositionSet, SQUARE_MASKS};
use crate::constants::{Piece, PieceKind, Player, SQUARES};
use crate::position::Position;
use once_cell::sync::Lazy;

const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// How a piece kind moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// One step along the lines of its own palace.
    Palace,
    /// One step forward or sideways, plus forward diagonals inside the enemy palace.
    Soldier,
    /// One orthogonal step then `n` diagonal steps away from the origin. Every
    /// cell before the destination must be empty.
    Leap(usize),
    /// Any distance along a line, capturing the first enemy met.
    Slide,
    /// Along a line, over exactly one non-cannon screen.
    Jump,
}

impl Rule {
    pub fn of(kind: PieceKind) -> Rule {
        match kind {
            PieceKind::General | PieceKind::Guard => Rule::Palace,
            PieceKind::Soldier => Rule::Soldier,
            PieceKind::Horse => Rule::Leap(1),
            PieceKind::Elephant => Rule::Leap(2),
            PieceKind::Chariot => Rule::Slide,
            PieceKind::Cannon => Rule::Jump,
        }
    }
}

/// A fixed-shape move: the cells that must be empty and the landing cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leap {
    pub legs: Vec<usize>,
    pub dest: usize,
}

/// A struct to hold all the pre-computed tables.
/// The tables are initialized once and then accessed globally.
pub struct MoveTables {
    pub palace: [[Bitboard; SQUARES]; 2], // [player_idx][square]
    pub soldier: [[Bitboard; SQUARES]; 2], // [player_idx][square]
    pub horse: Vec<Vec<Leap>>,
    pub elephant: Vec<Vec<Leap>>,
    /// Ordered lines leaving each square: the four orthogonal rays, then any
    /// palace diagonals that start there.
    pub rays: Vec<Vec<Vec<usize>>>,
}

impl MoveTables {
    fn new() -> Self {
        let mut tables = MoveTables {
            palace: [[0; SQUARES]; 2],
            soldier: [[0; SQUARES]; 2],
            horse: Vec::with_capacity(SQUARES),
            elephant: Vec::with_capacity(SQUARES),
            rays: Vec::with_capacity(SQUARES),
        };

        for sq in 0..SQUARES {
            let from = Position::from_index(sq);
            for player in [Player::Red, Player::Blue] {
                tables.palace[player.index()][sq] = palace_steps(from, player);
                tables.soldier[player.index()][sq] = soldier_steps(from, player);
            }
            tables.horse.push(leaps(from, 1));
            tables.elephant.push(leaps(from, 2));
            tables.rays.push(lines(from));
        }

        tables
    }

    pub fn leaps(&self, diagonal_steps: usize, sq: usize) -> &[Leap] {
        match diagonal_steps {
            1 => &self.horse[sq],
            2 => &self.elephant[sq],
            _ => &[],
        }
    }
}

// The global static instance of the tables, initialized lazily and only once.
pub static MOVE_TABLES: Lazy<MoveTables> = Lazy::new(MoveTables::new);

/// Diagonal neighbours of `from` joined to it by a palace line.
fn palace_diagonals(from: Position) -> impl Iterator<Item = (isize, Position)> {
    let fortress = from.fortress();
    DIAGONAL.into_iter().filter_map(move |(dr, dc)| {
        if !from.on_fortress_diagonal() {
            return None;
        }
        let to = from.offset(dr, dc)?;
        (to.fortress() == fortress).then_some((dr, to))
    })
}

fn palace_steps(from: Position, player: Player) -> Bitboard {
    if !from.in_fortress_of(player) {
        return 0;
    }
    let mut moves = 0;
    for (dr, dc) in ORTHOGONAL {
        if let Some(to) = from.offset(dr, dc).filter(|to| to.in_fortress_of(player)) {
            moves |= SQUARE_MASKS[to.index()];
        }
    }
    for (_, to) in palace_diagonals(from) {
        moves |= SQUARE_MASKS[to.index()];
    }
    moves
}

fn soldier_steps(from: Position, player: Player) -> Bitboard {
    let forward = player.forward();
    let mut moves = 0;
    for (dr, dc) in [(forward, 0), (0, -1), (0, 1)] {
        if let Some(to) = from.offset(dr, dc) {
            moves |= SQUARE_MASKS[to.index()];
        }
    }
    if from.in_fortress_of(player.opponent()) {
        for (dr, to) in palace_diagonals(from) {
            if dr == forward {
                moves |= SQUARE_MASKS[to.index()];
            }
        }
    }
    moves
}

/// Orthogonal step followed by `diagonal_steps` steps into one of the two
/// quadrants that continue away from the origin.
fn leaps(from: Position, diagonal_steps: usize) -> Vec<Leap> {
    let mut result = Vec::new();
    for (dr, dc) in ORTHOGONAL {
        let fans = if dr != 0 { [(dr, -1), (dr, 1)] } else { [(-1, dc), (1, dc)] };
        for (fr, fc) in fans {
            let Some(first) = from.offset(dr, dc) else { continue };
            let mut path = vec![first.index()];
            let mut cursor = Some(first);
            for _ in 0..diagonal_steps {
                cursor = cursor.and_then(|p| p.offset(fr, fc));
                match cursor {
                    Some(p) => path.push(p.index()),
                    None => break,
                }
            }
            if cursor.is_none() {
                continue;
            }
            let dest = path.pop().unwrap_or(first.index());
            result.push(Leap { legs: path, dest });
        }
    }
    result
}

fn lines(from: Position) -> Vec<Vec<usize>> {
    let mut lines = Vec::with_capacity(8);
    for (dr, dc) in ORTHOGONAL {
        let mut ray = Vec::new();
        let mut cursor = from.offset(dr, dc);
        while let Some(p) = cursor {
            ray.push(p.index());
            cursor = p.offset(dr, dc);
        }
        lines.push(ray);
    }
    // Palace diagonals never leave the palace they start in.
    if from.on_fortress_diagonal() {
        for (dr, dc) in DIAGONAL {
            let mut ray = Vec::new();
            let mut cursor = from.offset(dr, dc);
            while let Some(p) = cursor.filter(|p| p.fortress() == from.fortress()) {
                ray.push(p.index());
                cursor = p.offset(dr, dc);
            }
            if !ray.is_empty() {
                lines.push(ray);
            }
        }
    }
    lines
}

fn slide(ray: &[usize], occupied: Bitboard, opponents: Bitboard) -> Bitboard {
    let mut moves = 0;
    for &sq in ray {
        let mask = SQUARE_MASKS[sq];
        if occupied & mask == 0 {
            moves |= mask;
            continue;
        }
        if opponents & mask != 0 {
            moves |= mask;
        }
        break;
    }
    moves
}

fn jump(ray: &[usize], occupied: Bitboard, opponents: Bitboard, cannons: Bitboard) -> Bitboard {
    let mut cells = ray.iter();
    let Some(&screen) = cells.by_ref().find(|&&sq| occupied & SQUARE_MASKS[sq] != 0) else {
        return 0;
    };
    if cannons & SQUARE_MASKS[screen] != 0 {
        return 0;
    }
    let mut moves = 0;
    for &sq in cells {
        let mask = SQUARE_MASKS[sq];
        if occupied & mask == 0 {
            moves |= mask;
            continue;
        }
        if opponents & mask != 0 && cannons & mask == 0 {
            moves |= mask;
        }
        break;
    }
    moves
}

/// Cells `piece` standing on `from` could move to this turn.
///
/// `opponents` holds the cells of the other side; an occupied cell outside it
/// is friendly and never a destination. Whether the move exposes the mover's
/// own general is not considered here.
pub fn legal_moves(piece: Piece, from: Position, board: &Board, opponents: PositionSet) -> PositionSet {
    let tables = &*MOVE_TABLES;
    let sq = from.index();
    let occupied = board.occupied_bitboard();
    let opponents = opponents.bitboard() & occupied;
    let friendly = occupied & !opponents;

    let moves = match Rule::of(piece.kind) {
        Rule::Palace => tables.palace[piece.owner.index()][sq] & !friendly,
        Rule::Soldier => tables.soldier[piece.owner.index()][sq] & !friendly,
        Rule::Leap(steps) => tables
            .leaps(steps, sq)
            .iter()
            .filter(|leap| leap.legs.iter().all(|&leg| occupied & SQUARE_MASKS[leg] == 0))
            .fold(0, |acc, leap| acc | SQUARE_MASKS[leap.dest])
            & !friendly,
        Rule::Slide => tables.rays[sq]
            .iter()
            .fold(0, |acc, ray| acc | slide(ray, occupied, opponents)),
        Rule::Jump => {
            let cannons = board.cannon_bitboard();
            tables.rays[sq]
                .iter()
                .fold(0, |acc, ray| acc | jump(ray, occupied, opponents, cannons))
        }
    };

    PositionSet::from_bitboard(moves & !SQUARE_MASKS[sq])
}
