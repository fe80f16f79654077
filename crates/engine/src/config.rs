//! Configuration for a Janggi game.

use crate::constants::{PieceKind, Player};

/// Horse and elephant on a flank's two files, in file order (b, c on the left,
/// g, h on the right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flank {
    #[default]
    ElephantHorse,
    HorseElephant,
}

/// Horse/elephant arrangement a side picks before play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Formation {
    pub left: Flank,
    pub right: Flank,
}

impl Flank {
    fn kinds(self) -> [PieceKind; 2] {
        match self {
            Flank::ElephantHorse => [PieceKind::Elephant, PieceKind::Horse],
            Flank::HorseElephant => [PieceKind::Horse, PieceKind::Elephant],
        }
    }
}

impl Formation {
    /// Back-rank pieces from file a to file i. File e stays empty: the general
    /// starts one rank forward, on the palace centre.
    pub fn back_rank(self) -> [Option<PieceKind>; 9] {
        let [b, c] = self.left.kinds();
        let [g, h] = self.right.kinds();
        [
            Some(PieceKind::Chariot),
            Some(b),
            Some(c),
            Some(PieceKind::Guard),
            None,
            Some(PieceKind::Guard),
            Some(g),
            Some(h),
            Some(PieceKind::Chariot),
        ]
    }
}

pub struct Config {
    pub first_player: Player,
    pub red_formation: Formation,
    pub blue_formation: Formation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            first_player: Player::Blue,
            red_formation: Formation::default(),
            blue_formation: Formation::default(),
        }
    }
}

impl Config {
    pub fn formation(&self, player: Player) -> Formation {
        match player {
            Player::Red => self.red_formation,
            Player::Blue => self.blue_formation,
        }
    }
}
