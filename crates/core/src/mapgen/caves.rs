//! Cave carving and connectivity pruning.

use std::collections::BTreeSet;

use log::debug;

use crate::error::GenerationError;
use crate::geometry::Flooded;
use crate::level::Level;
use crate::rng::Alea;
use crate::types::{Pos, TileKind};

use super::budget::StepBudget;
use super::grid::{floor_groups, is_floor, is_wall};

/// Opens inner walls in shuffled order, skipping any wall whose opening
/// would touch exactly one floor run. Returns the number of tiles opened.
pub(super) fn carve_caves(level: &mut Level, rng: &mut Alea) -> usize {
    let mut order: Vec<Pos> = level.shape().inner_positions().collect();
    rng.shuffle(&mut order);
    let mut carved = 0;
    for pos in order {
        if is_wall(level, pos) && floor_groups(level, pos) != 1 {
            level.set_tile(pos, TileKind::Floor);
            carved += 1;
        }
    }
    debug!("carve_caves: opened {carved} tiles");
    carved
}

#[derive(Default)]
struct WallFlood {
    visited: BTreeSet<Pos>,
    group: Vec<Pos>,
}

/// Opens every connected wall group smaller than `limit` tiles. Each wall is
/// flooded at most once across the whole pass.
pub(super) fn remove_small_walls(
    level: &mut Level,
    limit: usize,
    budget: &mut StepBudget,
) -> Result<usize, GenerationError> {
    let shape = level.shape();
    let mut flood = WallFlood::default();
    let mut removed_groups = 0;
    for pos in shape.inner_positions() {
        flood.group.clear();
        let walls = &*level;
        let size = shape.floodfill(
            pos,
            &mut flood,
            |flood, candidate| is_wall(walls, candidate) && !flood.visited.contains(&candidate),
            |flood, candidate| {
                flood.visited.insert(candidate);
                flood.group.push(candidate);
            },
        );
        budget.charge(size)?;
        if size > 0 && size < limit {
            removed_groups += 1;
            for &wall in &flood.group {
                if shape.is_inner(wall) {
                    level.set_tile(wall, TileKind::Floor);
                }
            }
        }
    }
    debug!("remove_small_walls: opened {removed_groups} wall groups smaller than {limit}");
    Ok(removed_groups)
}

/// Walls off every floor tile not connected to the start. Returns the size
/// of the remaining main cave.
pub(super) fn remove_other_caves(
    level: &mut Level,
    budget: &mut StepBudget,
) -> Result<usize, GenerationError> {
    let shape = level.shape();
    let mut main_cave = Flooded::new();
    let floors = &*level;
    shape.floodfill_set(floors.start(), |pos| is_floor(floors, pos), &mut main_cave);
    budget.charge(main_cave.len())?;

    let mut walled = 0;
    for pos in shape.inner_positions() {
        if is_floor(level, pos) && !main_cave.contains(pos) {
            level.set_tile(pos, TileKind::Wall);
            walled += 1;
        }
    }
    debug!("remove_other_caves: main cave holds {} tiles, walled {walled}", main_cave.len());
    Ok(main_cave.len())
}
