use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use hexcave_core::{
    GenerationConfig, Level, MapGenerator, Pos, SaveFile, Seed, VisibilityTracker, World,
};
use log::{LevelFilter, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log generation details regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a level and print it as ASCII
    Generate {
        #[command(flatten)]
        level: LevelArgs,
        /// Player start as `x,y`; defaults to the grid centre
        #[arg(long, value_parser = parse_start)]
        start: Option<(i32, i32)>,
        /// Mark the start with `@` and the tiles visible from it with `*`
        #[arg(long)]
        fov: bool,
        /// Print how many tiles fall in each openness bucket
        #[arg(long)]
        openness: bool,
        /// Also generate the level below, joined to this one by stairs
        #[arg(long)]
        stairs: bool,
    },
    /// Create a fresh world and write it to a save file
    Save {
        #[command(flatten)]
        level: LevelArgs,
        /// Path of the save file to write
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Load a save file and summarise it
    Load {
        /// Path of the save file to read
        path: PathBuf,
    },
}

#[derive(Args)]
struct LevelArgs {
    /// TOML file with generation settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number or text; defaults to the current time in milliseconds
    #[arg(short, long)]
    seed: Option<String>,
    #[arg(long)]
    width: Option<i32>,
    #[arg(long)]
    height: Option<i32>,
}

impl LevelArgs {
    fn config(&self) -> Result<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GenerationConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        config.validate().context("Invalid generation settings")?;
        Ok(config)
    }

    fn seed(&self) -> Result<Seed> {
        match &self.seed {
            Some(raw) => Ok(Seed::parse(raw)),
            None => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .context("System clock is before the Unix epoch")?;
                let millis = i64::try_from(now.as_millis()).context("Clock out of range")?;
                Ok(Seed::Integer(millis))
            }
        }
    }
}

fn load_config(path: &Path) -> Result<GenerationConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn parse_start(raw: &str) -> Result<(i32, i32), String> {
    let (x, y) = raw.split_once(',').ok_or_else(|| format!("expected x,y but got {raw:?}"))?;
    let x = x.trim().parse().map_err(|err| format!("bad x in {raw:?}: {err}"))?;
    let y = y.trim().parse().map_err(|err| format!("bad y in {raw:?}: {err}"))?;
    Ok((x, y))
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate { level, start, fov, openness, stairs } => {
            generate(&level, start, GenerateOptions { fov, openness, stairs })
        }
        Command::Save { level, out } => save(&level, &out),
        Command::Load { path } => load(&path),
    }
}

struct GenerateOptions {
    fov: bool,
    openness: bool,
    stairs: bool,
}

fn generate(args: &LevelArgs, start: Option<(i32, i32)>, options: GenerateOptions) -> Result<()> {
    let config = args.config()?;
    let seed = args.seed()?;
    let shape = config.shape();
    let (x, y) = start.unwrap_or((config.width / 2, config.height / 2));
    let generator = MapGenerator::new(config);
    let (generated, below) = if options.stairs {
        let linked = generator
            .generate_linked(seed.clone(), shape.xy2pos(x, y))
            .with_context(|| format!("Linked generation failed for seed {seed}"))?;
        (linked.upper, Some(linked.lower))
    } else {
        let generated = generator
            .generate(seed.clone(), shape.xy2pos(x, y))
            .with_context(|| format!("Generation failed for seed {seed}"))?;
        (generated, None)
    };
    let level = &generated.level;
    let (start_x, start_y) = shape.pos2xy(level.start());

    println!("Seed: {seed}");
    println!("Final seed: {} ({} attempt(s))", generated.final_seed, generated.attempts);
    println!("Start: {start_x},{start_y}");
    println!("Fingerprint: {:016x}", level.fingerprint());
    println!();

    if options.fov {
        let mut tracker = VisibilityTracker::new();
        tracker.look(level, level.start());
        print!("{}", render_view(level, level.start(), &tracker));
        println!();
        println!("Visible: {}, remembered: {}", tracker.visible().len(), tracker.memory().len());
    } else {
        print!("{}", level.render_ascii());
    }

    if options.openness {
        println!();
        println!("Openness:");
        for (bucket, tiles) in level.openness_map().histogram(10) {
            println!("  {bucket:>4}-{:<4} {tiles}", bucket + 9);
        }
    }

    if let Some(below) = below {
        println!();
        let fingerprint = below.level.fingerprint();
        println!("Below: seed {}, fingerprint {fingerprint:016x}", below.final_seed);
        print!("{}", below.level.render_ascii());
    }
    Ok(())
}

fn render_view(level: &Level, observer: Pos, tracker: &VisibilityTracker) -> String {
    level.render_with(|pos, kind| {
        if pos == observer {
            '@'
        } else if tracker.is_visible(pos) {
            '*'
        } else {
            kind.glyph()
        }
    })
}

fn save(args: &LevelArgs, out: &Path) -> Result<()> {
    let config = args.config()?;
    let seed = args.seed()?;
    let mut world = World::new(seed.clone(), &config)
        .with_context(|| format!("Generation failed for seed {seed}"))?;
    world.run_until_input(1);

    let save = SaveFile::from_world(&world).context("Failed to encode world")?;
    save.write_atomic(out)
        .with_context(|| format!("Failed to write save file: {}", out.display()))?;
    info!("snapshot {:016x}", world.snapshot_hash());
    println!("Saved seed {seed} to {}", out.display());
    Ok(())
}

fn load(path: &Path) -> Result<()> {
    let save = SaveFile::load(path)
        .with_context(|| format!("Failed to load save file: {}", path.display()))?;
    let world = save.into_world();
    let level = world.level();
    let (x, y) = level.shape().pos2xy(world.player_pos());

    println!("Seed: {}", world.seed());
    println!("Level: {}x{}, fingerprint {:016x}", level.width(), level.height(), level.fingerprint());
    println!("Player: {x},{y}");
    println!("Actors scheduled: {}", world.schedule().len());
    println!("Regrowing grass: {}", world.grass_delays().len());
    println!(
        "Visible: {}, remembered: {}",
        world.vision().visible().len(),
        world.vision().memory().len()
    );
    println!("Snapshot hash: {:016x}", world.snapshot_hash());
    println!();
    print!("{}", render_view(level, world.player_pos(), world.vision()));
    Ok(())
}
