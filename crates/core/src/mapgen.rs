//! Cave level generation split into its phases.

pub mod model;

mod budget;
mod caves;
mod dead_ends;
mod decorate;
mod generator;
mod grid;
mod stairs;

pub use generator::MapGenerator;
pub use model::{GeneratedLevel, LinkedLevels};

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::seed::Seed;
use crate::types::Pos;

pub fn generate_level(
    seed: impl Into<Seed>,
    start: Pos,
    config: &GenerationConfig,
) -> Result<GeneratedLevel, GenerationError> {
    MapGenerator::new(config.clone()).generate(seed, start)
}
