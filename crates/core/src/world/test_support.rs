//! Shared world fixtures for the unit tests of `world` and `save`.

use super::World;
use crate::config::GenerationConfig;
use crate::geometry::GridShape;
use crate::level::Level;
use crate::seed::Seed;
use crate::types::TileKind;

/// A 16x13 grid whose inner region is bare floor, with the player at (8, 6).
/// `tweaks` overwrite single tiles by `(x, y)`.
pub(crate) fn meadow(tweaks: &[((i32, i32), TileKind)]) -> World {
    let shape = GridShape::new(16, 13);
    let mut level = Level::filled(shape, TileKind::Wall, shape.xy2pos(8, 6));
    for pos in shape.inner_positions() {
        level.set_tile(pos, TileKind::Floor);
    }
    for &((x, y), kind) in tweaks {
        level.set_tile(shape.xy2pos(x, y), kind);
    }
    let config = GenerationConfig { width: 16, height: 13, ..GenerationConfig::default() };
    World::from_level(Seed::from("meadow"), config, level, 1)
}
