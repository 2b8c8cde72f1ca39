use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityId;
}

/// Flat index into the rectangular array backing a hex grid.
///
/// A `Pos` may point outside the playable region, or even outside the
/// backing array, after neighbor arithmetic. Such positions are valid values
/// that simply hold no tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pos(pub i32);

impl Add<i32> for Pos {
    type Output = Pos;

    fn add(self, offset: i32) -> Pos {
        Pos(self.0 + offset)
    }
}

impl AddAssign<i32> for Pos {
    fn add_assign(&mut self, offset: i32) {
        self.0 += offset;
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The six hex neighbors, named after clock positions and listed clockwise
/// starting at one o'clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    NorthEast,
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
}

pub const DIRECTION_COUNT: usize = 6;

impl Direction {
    pub const ALL: [Direction; DIRECTION_COUNT] = [
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Offset of this neighbor in a backing array `width` cells wide.
    pub fn offset(self, width: i32) -> i32 {
        match self {
            Direction::NorthEast => 1 - width,
            Direction::East => 1,
            Direction::SouthEast => width,
            Direction::SouthWest => width - 1,
            Direction::West => -1,
            Direction::NorthWest => -width,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The direction `steps` places further clockwise.
    pub fn rotated(self, steps: usize) -> Direction {
        Direction::ALL[(self.index() + steps) % DIRECTION_COUNT]
    }
}

/// How much sight passes through a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Transparency {
    Opaque,
    /// Blocks the live view but still lets the observer remember what is behind.
    Dim,
    Clear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    ShortGrass,
    TallGrass,
    Spikes,
    UpStairs,
    DownStairs,
}

impl TileKind {
    pub fn passable(self) -> bool {
        match self {
            TileKind::Floor
            | TileKind::ShortGrass
            | TileKind::TallGrass
            | TileKind::UpStairs
            | TileKind::DownStairs => true,
            TileKind::Wall | TileKind::Spikes => false,
        }
    }

    pub fn transparency(self) -> Transparency {
        match self {
            TileKind::Wall => Transparency::Opaque,
            TileKind::TallGrass => Transparency::Dim,
            TileKind::Floor
            | TileKind::ShortGrass
            | TileKind::Spikes
            | TileKind::UpStairs
            | TileKind::DownStairs => Transparency::Clear,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Floor => '.',
            TileKind::ShortGrass => ',',
            TileKind::TallGrass => '"',
            TileKind::Spikes => '^',
            TileKind::UpStairs => '<',
            TileKind::DownStairs => '>',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<TileKind> {
        match glyph {
            '#' => Some(TileKind::Wall),
            '.' => Some(TileKind::Floor),
            ',' => Some(TileKind::ShortGrass),
            '"' => Some(TileKind::TallGrass),
            '^' => Some(TileKind::Spikes),
            '<' => Some(TileKind::UpStairs),
            '>' => Some(TileKind::DownStairs),
            _ => None,
        }
    }

    pub(crate) fn code(self) -> u8 {
        match self {
            TileKind::Wall => 0,
            TileKind::Floor => 1,
            TileKind::ShortGrass => 2,
            TileKind::TallGrass => 3,
            TileKind::Spikes => 4,
            TileKind::UpStairs => 5,
            TileKind::DownStairs => 6,
        }
    }
}
