use std::collections::BTreeSet;

use hexcave_core::{
    Flooded, GeneratedLevel, GenerationConfig, Level, MapGenerator, Pos, TileKind, Transparency,
};
use proptest::prelude::*;

fn generate(seed: u32, config: GenerationConfig) -> GeneratedLevel {
    let start = config.shape().xy2pos(config.width / 2, config.height / 2);
    MapGenerator::new(config).generate(seed, start).expect("generation succeeds")
}

/// Positions of every maximal group of connected tiles matching `member`.
fn components(level: &Level, member: impl Fn(Pos) -> bool) -> Vec<BTreeSet<Pos>> {
    let shape = level.shape();
    let mut seen = BTreeSet::new();
    let mut groups = Vec::new();
    for pos in shape.positions() {
        if !member(pos) || seen.contains(&pos) {
            continue;
        }
        let mut group = Flooded::new();
        shape.floodfill_set(pos, &member, &mut group);
        seen.extend(group.iter());
        groups.push(group.iter().collect());
    }
    groups
}

fn check_invariants(generated: &GeneratedLevel, config: &GenerationConfig) {
    let level = &generated.level;
    let shape = level.shape();
    assert_eq!(shape, config.shape());

    for pos in shape.positions().filter(|&pos| shape.on_border(pos)) {
        assert_eq!(level.tile(pos), Some(TileKind::Wall), "border tile {pos}");
    }

    let open = components(level, |pos| level.passable(pos));
    assert_eq!(open.len(), 1, "exactly one walkable region");
    assert!(open[0].contains(&level.start()));

    for (pos, kind) in level.tiles() {
        if kind == TileKind::Wall {
            assert_eq!(level.openness(pos), 0, "walls are not lit at {pos}");
        } else {
            assert!(level.openness(pos) > 0, "open tile {pos} sees at least itself");
        }
        assert_eq!(level.transparency(pos) == Transparency::Opaque, kind == TileKind::Wall);
    }
}

#[test]
fn default_grid_levels_hold_their_invariants() {
    let config = GenerationConfig::default();
    for seed in [1, 3, 7, 8, 42, 12345] {
        check_invariants(&generate(seed, config.clone()), &config);
    }
}

/// Grids no taller than three quarters of their width. Narrower hexagons
/// rarely leave room for a main cave of a quarter of the rectangle.
fn roomy_shape() -> impl Strategy<Value = (i32, i32)> {
    (20..40i32).prop_flat_map(|width| (Just(width), 15..=width * 3 / 4))
}

#[test]
fn linked_levels_hold_their_invariants() {
    let config = GenerationConfig::default();
    let start = config.shape().xy2pos(config.width / 2, config.height / 2);
    for seed in [1, 42] {
        let generator = MapGenerator::new(config.clone());
        let linked = generator.generate_linked(seed, start).expect("linked levels");
        check_invariants(&linked.upper, &config);
        check_invariants(&linked.lower, &config);
        assert_eq!(linked.upper.level.tile(linked.stairs), Some(TileKind::DownStairs));
        assert_eq!(linked.lower.level.tile(linked.stairs), Some(TileKind::UpStairs));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn levels_hold_their_invariants_across_seeds_and_sizes(
        seed in any::<u32>(),
        (width, height) in roomy_shape(),
    ) {
        let config = GenerationConfig { width, height, ..GenerationConfig::default() };
        let generated = generate(seed, config.clone());
        check_invariants(&generated, &config);
        prop_assert!(generated.attempts >= 1);
        prop_assert!(generated.attempts <= config.max_attempts);
    }
}
