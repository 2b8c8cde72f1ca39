pub mod config;
pub mod error;
pub mod fov;
pub mod geometry;
pub mod level;
pub mod mapgen;
pub mod noise;
pub mod rng;
pub mod save;
pub mod seed;
pub mod types;
pub mod visibility;
pub mod world;

pub use config::GenerationConfig;
pub use error::{
    ActionError, ConfigError, ConsistencyError, GenerationError, LevelFormatError, SaveError,
};
pub use fov::shadowcast;
pub use geometry::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Flooded, GridShape};
pub use level::{Level, OpennessMap};
pub use mapgen::{GeneratedLevel, LinkedLevels, MapGenerator, generate_level};
pub use noise::Simplex;
pub use rng::Alea;
pub use save::{SAVE_FORMAT_VERSION, SaveFile};
pub use seed::Seed;
pub use types::*;
pub use visibility::VisibilityTracker;
pub use world::{Behavior, Entity, RunSummary, SPIKE_DELAY, StepOutcome, World};
