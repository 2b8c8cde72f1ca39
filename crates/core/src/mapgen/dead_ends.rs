//! Dead-end filling and small-cave removal.
//!
//! Filling one dead end can expose another, so fills cascade outward in
//! depth-first neighbor order. Removing a small cave late in the pass can
//! re-expose dead ends near positions already processed; that is accepted,
//! each inner position is visited exactly once.

use log::debug;

use crate::error::GenerationError;
use crate::geometry::Flooded;
use crate::level::Level;
use crate::types::{DIRECTION_COUNT, Direction, Pos, TileKind};

use super::budget::StepBudget;
use super::grid::{is_cave, is_dead_end, is_floor};

/// Walls off `pos` if it is a dead end, then cascades into its neighbors.
/// When the start tile is filled the start moves to the next floor
/// neighbor first. Returns the number of tiles filled.
pub(super) fn fill_dead_end(
    level: &mut Level,
    pos: Pos,
    budget: &mut StepBudget,
) -> Result<usize, GenerationError> {
    if !is_dead_end(level, pos) {
        return Ok(0);
    }
    let shape = level.shape();
    level.set_tile(pos, TileKind::Wall);
    budget.charge(1)?;
    let mut filled = 1;
    let mut stack = vec![(pos, 0_usize)];
    while let Some(top) = stack.last_mut() {
        let (current, next_direction) = *top;
        if next_direction == DIRECTION_COUNT {
            stack.pop();
            continue;
        }
        top.1 += 1;
        let neighbor = shape.step(current, Direction::ALL[next_direction]);
        if current == level.start() && is_floor(level, neighbor) {
            level.set_start(neighbor);
        }
        if is_dead_end(level, neighbor) {
            level.set_tile(neighbor, TileKind::Wall);
            budget.charge(1)?;
            filled += 1;
            stack.push((neighbor, 0));
        }
    }
    Ok(filled)
}

/// Fills dead ends at every inner position and walls off cave pockets of two
/// or three tiles. Returns the number of tiles filled.
pub(super) fn fill_small_caves(
    level: &mut Level,
    budget: &mut StepBudget,
) -> Result<usize, GenerationError> {
    let shape = level.shape();
    let mut filled = 0;
    let mut pockets = 0;
    for pos in shape.inner_positions() {
        filled += fill_dead_end(level, pos, budget)?;

        let mut cave = Flooded::new();
        let caves = &*level;
        shape.floodfill_set(pos, |candidate| is_cave(caves, candidate), &mut cave);
        budget.charge(cave.len())?;
        if !(2..=3).contains(&cave.len()) {
            continue;
        }

        pockets += 1;
        if pos == level.start() {
            relocate_start(level, pos);
        }
        level.set_tile(pos, TileKind::Wall);
        filled += 1;
        for member in cave.iter() {
            filled += fill_dead_end(level, member, budget)?;
        }
    }
    debug!("fill_small_caves: filled {filled} tiles, removed {pockets} small caves");
    Ok(filled)
}

/// Moves the start off `pos` onto its first floor neighbor, if any.
fn relocate_start(level: &mut Level, pos: Pos) {
    let shape = level.shape();
    if let Some(neighbor) = shape.neighbors(pos).into_iter().find(|&n| is_floor(level, n)) {
        level.set_start(neighbor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GridShape;

    fn shape() -> GridShape {
        GridShape::new(14, 11)
    }

    fn budget(shape: GridShape) -> StepBudget {
        StepBudget::for_shape("fill_small_caves", shape)
    }

    fn level_with_floor(shape: GridShape, start: (i32, i32), floors: &[(i32, i32)]) -> Level {
        let mut level = Level::filled(shape, TileKind::Wall, shape.xy2pos(start.0, start.1));
        for &(x, y) in floors {
            level.set_tile(shape.xy2pos(x, y), TileKind::Floor);
        }
        level
    }

    #[test]
    fn corridor_collapses_until_a_pair_remains() {
        let shape = shape();
        let corridor = [(4, 5), (5, 5), (6, 5), (7, 5), (8, 5)];
        let mut level = level_with_floor(shape, (8, 5), &corridor);
        let filled = fill_dead_end(&mut level, shape.xy2pos(4, 5), &mut budget(shape))
            .expect("within budget");
        assert_eq!(filled, 3);
        let floors: Vec<Pos> =
            level.tiles().filter(|&(_, kind)| kind == TileKind::Floor).map(|(pos, _)| pos).collect();
        assert_eq!(floors, vec![shape.xy2pos(7, 5), shape.xy2pos(8, 5)]);
    }

    #[test]
    fn start_follows_the_collapsing_corridor() {
        let shape = shape();
        let corridor = [(4, 5), (5, 5), (6, 5), (7, 5)];
        let mut level = level_with_floor(shape, (4, 5), &corridor);
        fill_dead_end(&mut level, shape.xy2pos(4, 5), &mut budget(shape)).expect("within budget");
        assert_eq!(level.start(), shape.xy2pos(6, 5));
        assert!(level.passable(level.start()));
    }

    #[test]
    fn non_dead_ends_are_left_alone() {
        let shape = shape();
        let corridor = [(4, 5), (5, 5), (6, 5)];
        let mut level = level_with_floor(shape, (5, 5), &corridor);
        let filled = fill_dead_end(&mut level, shape.xy2pos(5, 5), &mut budget(shape))
            .expect("within budget");
        assert_eq!(filled, 0);
        assert_eq!(level.count(TileKind::Floor), 3);
    }

    #[test]
    fn small_caves_shrink_without_stranding_the_start() {
        let shape = shape();
        let triangle = [(6, 4), (7, 4), (6, 5)];
        let mut level = level_with_floor(shape, (6, 4), &triangle);
        fill_small_caves(&mut level, &mut budget(shape)).expect("within budget");
        assert_eq!(level.count(TileKind::Floor), 1);
        assert_eq!(level.start(), shape.xy2pos(6, 5));
        assert!(level.passable(level.start()));
    }

    #[test]
    fn open_rooms_survive() {
        let shape = shape();
        let mut level = level_with_floor(shape, (7, 5), &[]);
        for pos in shape.inner_positions() {
            level.set_tile(pos, TileKind::Floor);
        }
        let before = level.count(TileKind::Floor);
        let filled = fill_small_caves(&mut level, &mut budget(shape)).expect("within budget");
        assert_eq!(filled, 0);
        assert_eq!(level.count(TileKind::Floor), before);
    }
}
