//! Stairs joining a level to the one generated below it.
//!
//! A staircase is cut into a wall that touches exactly one run of open
//! tiles and keeps four wall neighbors, at the same position on both levels.

use std::collections::BTreeSet;

use crate::fov::shadowcast;
use crate::level::Level;
use crate::types::{Pos, TileKind};

pub(super) fn is_stair_site(level: &Level, pos: Pos) -> bool {
    let shape = level.shape();
    let walls =
        shape.neighbors(pos).iter().filter(|&&neighbor| level.is(neighbor, TileKind::Wall)).count();
    shape.is_inner(pos)
        && level.is(pos, TileKind::Wall)
        && shape.count_groups(pos, |neighbor| level.passable(neighbor)) == 1
        && walls == 4
}

/// First candidate that is a stair site on both levels.
pub(super) fn find_shared_site(upper: &Level, lower: &Level, candidates: &[Pos]) -> Option<Pos> {
    candidates
        .iter()
        .copied()
        .find(|&pos| is_stair_site(upper, pos) && is_stair_site(lower, pos))
}

pub(super) fn place_stairs(upper: &mut Level, lower: &mut Level, pos: Pos) {
    upper.set_tile(pos, TileKind::DownStairs);
    lower.set_tile(pos, TileKind::UpStairs);
    light(upper, pos);
    light(lower, pos);
}

/// Gives a freshly cut staircase the openness a floor tile there would have.
fn light(level: &mut Level, pos: Pos) {
    let shape = level.shape();
    let mut seen = BTreeSet::new();
    shadowcast(
        shape,
        pos,
        |target| level.tile(target).is_some_and(|kind| kind != TileKind::Wall),
        |target| {
            seen.insert(target);
        },
    );
    let mut openness = level.openness_map().clone();
    openness.set(pos, u32::try_from(seen.len()).unwrap_or(u32::MAX));
    level.set_openness(openness);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GridShape;

    /// A floor corridor along row 4 with solid rock above and below.
    fn corridor() -> Level {
        let shape = GridShape::new(12, 9);
        let mut level = Level::filled(shape, TileKind::Wall, shape.xy2pos(6, 4));
        for x in 4..9 {
            level.set_tile(shape.xy2pos(x, 4), TileKind::Floor);
        }
        level
    }

    #[test]
    fn walls_beside_a_corridor_are_stair_sites() {
        let level = corridor();
        let shape = level.shape();
        // Opens onto (5,4) and (6,4) below.
        assert!(is_stair_site(&level, shape.xy2pos(6, 3)));
        // Buried in rock.
        assert!(!is_stair_site(&level, shape.xy2pos(6, 2)));
        // Floor is never a site.
        assert!(!is_stair_site(&level, shape.xy2pos(6, 4)));
        // Borders are never cut.
        assert!(!is_stair_site(&level, shape.xy2pos(6, 0)));
    }

    #[test]
    fn a_wall_between_two_runs_is_not_a_site() {
        let mut level = corridor();
        let shape = level.shape();
        level.set_tile(shape.xy2pos(5, 2), TileKind::Floor);
        level.set_tile(shape.xy2pos(6, 2), TileKind::Floor);
        assert_eq!(shape.count_groups(shape.xy2pos(6, 3), |pos| level.passable(pos)), 2);
        assert!(!is_stair_site(&level, shape.xy2pos(6, 3)));
    }

    #[test]
    fn the_shared_site_must_suit_both_levels() {
        let upper = corridor();
        let mut lower = corridor();
        let shape = upper.shape();
        let first = shape.xy2pos(6, 3);
        let second = shape.xy2pos(7, 3);
        lower.set_tile(shape.xy2pos(5, 2), TileKind::Floor);
        lower.set_tile(shape.xy2pos(6, 2), TileKind::Floor);

        assert_eq!(find_shared_site(&upper, &lower, &[first, second]), Some(second));
        assert_eq!(find_shared_site(&upper, &lower, &[first]), None);
    }

    #[test]
    fn placed_stairs_are_walkable_and_lit() {
        let mut upper = corridor();
        let mut lower = corridor();
        let pos = upper.shape().xy2pos(6, 3);
        place_stairs(&mut upper, &mut lower, pos);

        assert_eq!(upper.tile(pos), Some(TileKind::DownStairs));
        assert_eq!(lower.tile(pos), Some(TileKind::UpStairs));
        assert!(upper.passable(pos));
        assert!(upper.openness(pos) > 1);
        assert_eq!(upper.openness(pos), lower.openness(pos));
    }
}
