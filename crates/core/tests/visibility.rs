use std::collections::BTreeSet;

use hexcave_core::{GenerationConfig, GridShape, Pos, Seed, VisibilityTracker, World, shadowcast};

const SHAPE: GridShape = GridShape { width: 64, height: 64 };

fn center() -> Pos {
    SHAPE.xy2pos(32, 32)
}

/// Axial offset of `pos` from the centre.
fn axial(pos: Pos) -> (i32, i32) {
    let (x, y) = SHAPE.pos2xy(pos);
    (x - 32, y - 32)
}

fn from_axial((q, r): (i32, i32)) -> Pos {
    SHAPE.xy2pos(32 + q, 32 + r)
}

fn distance(pos: Pos) -> i32 {
    let (q, r) = axial(pos);
    (q.abs() + r.abs() + (q + r).abs()) / 2
}

fn reveal_disk(blocked: &[Pos]) -> BTreeSet<Pos> {
    let mut seen = BTreeSet::new();
    shadowcast(
        SHAPE,
        center(),
        |pos| distance(pos) <= 5 && !blocked.contains(&pos),
        |pos| {
            seen.insert(pos);
        },
    );
    seen
}

#[test]
fn open_disk_reveals_its_bounding_ring() {
    let seen = reveal_disk(&[]);
    assert_eq!(seen.len(), 127);
    assert!(seen.iter().all(|&pos| distance(pos) <= 6));
    assert!(seen.contains(&center()));
}

#[test]
fn a_pillar_casts_a_widening_shadow() {
    let pillar = from_axial((1, 0));
    let open = reveal_disk(&[]);
    let shadowed = reveal_disk(&[pillar]);
    assert_eq!(shadowed.len(), 110);
    assert!(shadowed.contains(&pillar), "the pillar itself is seen");

    let mut hidden: Vec<(i32, i32)> =
        open.difference(&shadowed).map(|&pos| axial(pos)).collect();
    hidden.sort_unstable();
    let expected = vec![
        (2, 0),
        (2, 1),
        (3, -1),
        (3, 0),
        (3, 1),
        (3, 2),
        (4, -1),
        (4, 0),
        (4, 1),
        (4, 2),
        (5, -2),
        (5, -1),
        (5, 0),
        (5, 1),
        (6, -2),
        (6, -1),
        (6, 0),
    ];
    assert_eq!(hidden, expected);
}

#[test]
fn shadows_rotate_with_the_pillar() {
    let rotate = |(q, r): (i32, i32)| (-r, q + r);
    let base: Vec<(i32, i32)> =
        reveal_disk(&[from_axial((1, 0))]).into_iter().map(axial).collect();

    let mut pillar = (1, 0);
    let mut expected = base;
    for _ in 1..6 {
        pillar = rotate(pillar);
        expected = expected.into_iter().map(rotate).collect();
        let seen: BTreeSet<(i32, i32)> =
            reveal_disk(&[from_axial(pillar)]).into_iter().map(axial).collect();
        let rotated: BTreeSet<(i32, i32)> = expected.iter().copied().collect();
        assert_eq!(seen, rotated, "pillar at {pillar:?}");
    }
}

#[test]
fn recorded_seeds_see_and_remember_the_same_amount() {
    let cases = [
        (Seed::from(12345), 7, 19),
        (Seed::from(1), 47, 69),
        (Seed::from(42), 146, 146),
        (Seed::from("hex adventure"), 7, 28),
    ];
    let config = GenerationConfig::default();
    for (seed, visible, remembered) in cases {
        let world = World::new(seed.clone(), &config).expect("world");
        let level = world.level();
        let mut tracker = VisibilityTracker::new();
        tracker.look(level, level.start());
        assert_eq!(tracker.visible().len(), visible, "visible tiles for seed {seed}");
        assert_eq!(tracker.memory().len(), remembered, "remembered tiles for seed {seed}");
        assert!(tracker.visible().iter().all(|&pos| tracker.remembered(pos).is_some()));
    }
}

#[test]
fn the_first_player_turn_fills_the_view() {
    let mut world = World::new(1, &GenerationConfig::default()).expect("world");
    world.run_until_input(4);
    assert_eq!(world.vision().visible().len(), 47);
    assert!(world.vision().is_visible(world.player_pos()));
}
