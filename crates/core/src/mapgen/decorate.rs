//! Openness scoring and grass growth.

use std::collections::BTreeSet;

use log::debug;

use crate::config::GenerationConfig;
use crate::fov::shadowcast;
use crate::level::{Level, OpennessMap};
use crate::noise::Simplex;
use crate::types::TileKind;

use super::grid::is_floor;

/// Counts, for every inner floor tile, the distinct positions visible from
/// it when only floor lets sight through.
pub(super) fn measure_openness(level: &Level) -> OpennessMap {
    let shape = level.shape();
    let mut openness = OpennessMap::new(shape);
    let mut seen = BTreeSet::new();
    for pos in shape.inner_positions() {
        if !is_floor(level, pos) {
            continue;
        }
        seen.clear();
        shadowcast(shape, pos, |target| is_floor(level, target), |target| {
            seen.insert(target);
        });
        openness.set(pos, u32::try_from(seen.len()).unwrap_or(u32::MAX));
    }
    openness
}

/// Grows grass where the level is enclosed, modulated by noise so patches
/// vary smoothly across the map. The noise plane is sampled at
/// `(x, y, -x - y)`, the cube coordinates of the hex.
pub(super) fn grow_grass(
    level: &mut Level,
    openness: &OpennessMap,
    noise: &Simplex,
    config: &GenerationConfig,
) {
    let shape = level.shape();
    let mut tall = 0;
    let mut short = 0;
    for pos in shape.inner_positions() {
        if level.is(pos, TileKind::Wall) {
            continue;
        }
        let (x, y) = shape.pos2xy(pos);
        let z = -x - y;
        let zoom = config.noise_zoom;
        let density =
            noise.sample(f64::from(x) / zoom, f64::from(y) / zoom, f64::from(z) / zoom) + 1.0;
        let visible = f64::from(openness.get(pos));
        if visible < f64::from(config.tall_grass_threshold) * density {
            level.set_tile(pos, TileKind::TallGrass);
            tall += 1;
        } else if visible < f64::from(config.short_grass_threshold) * density {
            level.set_tile(pos, TileKind::ShortGrass);
            short += 1;
        }
    }
    debug!("grow_grass: {tall} tall grass, {short} short grass");
}
