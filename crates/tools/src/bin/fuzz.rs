use anyhow::{Context, Result, bail, ensure};
use clap::Parser;
use hexcave_core::{Direction, GenerationConfig, Seed, TileKind, World};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    turns: u32,
    /// Number of worlds to play, with consecutive level seeds
    #[arg(short, long, default_value_t = 1)]
    worlds: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn check_invariants(world: &World) -> Result<()> {
    let level = world.level();
    let shape = level.shape();
    let player = world.player_pos();
    ensure!(level.passable(player), "player stands on impassable tile {player}");

    let vision = world.vision();
    let forgotten = vision
        .visible()
        .iter()
        .find(|&&pos| shape.in_bounds(pos) && vision.remembered(pos).is_none());
    if let Some(pos) = forgotten {
        bail!("visible tile {pos} is not remembered");
    }

    for pos in shape.positions().filter(|&pos| shape.on_border(pos)) {
        ensure!(level.is(pos, TileKind::Wall), "border tile {pos} is no longer a wall");
    }
    world.check_consistency()?;
    Ok(())
}

fn play(level_seed: u64, turns: u32, rng: &mut ChaCha8Rng) -> Result<()> {
    let seed = Seed::Integer(i64::try_from(level_seed).context("level seed out of range")?);
    let mut world = World::new(seed.clone(), &GenerationConfig::default())
        .with_context(|| format!("generation failed for seed {seed}"))?;

    let mut moved = 0;
    let mut spikes = 0;
    for turn in 0..turns {
        let summary = world.run_until_input(4096);
        ensure!(summary.awaiting_input, "seed {seed}: turn {turn} never returned to the player");
        check_invariants(&world).with_context(|| format!("seed {seed}, turn {turn}"))?;

        if rng.next_u32() % 16 == 0 {
            world.cast_spike()?;
            spikes += 1;
        } else if world.move_player(choose(rng, &Direction::ALL))? {
            moved += 1;
        }
    }
    println!(
        "Seed {seed}: {moved} moves, {spikes} spikes, {} tiles remembered, snapshot {:016x}",
        world.vision().memory().len(),
        world.snapshot_hash()
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::init();

    println!(
        "Starting fuzz harness on seed {} for {} world(s) of {} turns...",
        args.seed, args.worlds, args.turns
    );
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for offset in 0..u64::from(args.worlds) {
        play(args.seed.wrapping_add(offset), args.turns, &mut rng)?;
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
