//! Tile predicates shared by the generation phases.
//!
//! During carving only walls and bare floor exist, so "passable" here means
//! exactly floor.

use crate::level::Level;
use crate::types::{Pos, TileKind};

pub(super) fn is_floor(level: &Level, pos: Pos) -> bool {
    level.is(pos, TileKind::Floor)
}

/// Off-grid positions are not walls; they hold no tile at all.
pub(super) fn is_wall(level: &Level, pos: Pos) -> bool {
    level.is(pos, TileKind::Wall)
}

pub(super) fn floor_groups(level: &Level, pos: Pos) -> u32 {
    level.shape().count_groups(pos, |neighbor| is_floor(level, neighbor))
}

/// A floor tile whose passable neighbors form a single run.
pub(super) fn is_cave(level: &Level, pos: Pos) -> bool {
    is_floor(level, pos) && floor_groups(level, pos) == 1
}

pub(super) fn is_not_cave(level: &Level, pos: Pos) -> bool {
    is_wall(level, pos) || floor_groups(level, pos) != 1
}

/// A cave tile boxed in by non-cave tiles; walling it never splits a cave.
pub(super) fn is_dead_end(level: &Level, pos: Pos) -> bool {
    is_cave(level, pos) && level.shape().surrounded(pos, |neighbor| is_not_cave(level, neighbor))
}
