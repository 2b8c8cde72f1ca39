//! Generation orchestration: runs the phases in order and retries attempts
//! whose main cave comes out too small.

use log::{debug, info, warn};

use crate::config::GenerationConfig;
use crate::error::{ConfigError, GenerationError};
use crate::level::Level;
use crate::noise::Simplex;
use crate::rng::Alea;
use crate::seed::Seed;
use crate::types::{Pos, TileKind};

use super::budget::StepBudget;
use super::caves::{carve_caves, remove_other_caves, remove_small_walls};
use super::dead_ends::fill_small_caves;
use super::decorate::{grow_grass, measure_openness};
use super::model::{GeneratedLevel, LinkedLevels};
use super::stairs::{find_shared_site, place_stairs};

pub struct MapGenerator {
    config: GenerationConfig,
}

enum Attempt {
    Accepted(Level),
    /// The main cave was too small; carries the seed for the next attempt.
    Rejected { cave_size: usize, next_seed: Seed },
}

impl MapGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates a level grown from `start`, which must be an inner tile.
    ///
    /// A rejected attempt reseeds from a value drawn off its own stream, so
    /// the whole run stays reproducible from the first seed.
    pub fn generate(
        &self,
        seed: impl Into<Seed>,
        start: Pos,
    ) -> Result<GeneratedLevel, GenerationError> {
        self.config.validate().map_err(|err| match err {
            ConfigError::GridTooSmall { width, height, .. } => {
                GenerationError::InvalidGrid { width, height }
            }
            other => GenerationError::Config(other),
        })?;
        let shape = self.config.shape();
        if !shape.is_inner(start) {
            return Err(GenerationError::StartOutOfBounds { pos: start });
        }

        let requested = seed.into();
        let mut seed = requested.clone();
        for attempt in 1..=self.config.max_attempts {
            match self.attempt(&seed, start)? {
                Attempt::Accepted(level) => {
                    info!(
                        "generated level for seed {requested} after {attempt} attempt(s), start {}",
                        level.start()
                    );
                    return Ok(GeneratedLevel { level, final_seed: seed, attempts: attempt });
                }
                Attempt::Rejected { cave_size, next_seed } => {
                    warn!(
                        "attempt {attempt} with seed {seed}: main cave of {cave_size} tiles is too small, reseeding with {next_seed}"
                    );
                    seed = next_seed;
                }
            }
        }
        warn!("giving up on seed {requested} after {} attempts", self.config.max_attempts);
        Err(GenerationError::RetriesExhausted { attempts: self.config.max_attempts })
    }

    /// Generates a level and the one below it, then cuts a down staircase
    /// into the first and an up staircase into the second at one position.
    ///
    /// Stair sites are tried in an order shuffled from the upper level's
    /// seed. Lower levels are regenerated from that same stream until one
    /// shares a site with the upper level.
    pub fn generate_linked(
        &self,
        seed: impl Into<Seed>,
        start: Pos,
    ) -> Result<LinkedLevels, GenerationError> {
        let mut upper = self.generate(seed, start)?;
        let mut rng = Alea::from_seeds(&[upper.final_seed.clone(), Seed::from("stairs")]);
        let mut candidates: Vec<Pos> = self.config.shape().inner_positions().collect();
        rng.shuffle(&mut candidates);

        for lower_attempts in 1..=self.config.max_attempts {
            let mut lower = self.generate(Seed::Number(rng.random()), start)?;
            let Some(stairs) = find_shared_site(&upper.level, &lower.level, &candidates) else {
                debug!("lower level {lower_attempts} shares no stair site, regenerating");
                continue;
            };
            place_stairs(&mut upper.level, &mut lower.level, stairs);
            info!("stairs at {stairs} after {lower_attempts} lower level(s)");
            return Ok(LinkedLevels { upper, lower, stairs, lower_attempts });
        }
        warn!("no lower level shared a stair site after {} tries", self.config.max_attempts);
        Err(GenerationError::RetriesExhausted { attempts: self.config.max_attempts })
    }

    fn attempt(&self, seed: &Seed, start: Pos) -> Result<Attempt, GenerationError> {
        let shape = self.config.shape();
        let mut rng = Alea::new(seed.clone());
        let noise = Simplex::new(rng.random());

        let mut level = Level::filled(shape, TileKind::Wall, start);
        level.set_tile(start, TileKind::Floor);

        carve_caves(&mut level, &mut rng);
        remove_small_walls(
            &mut level,
            self.config.small_wall_limit,
            &mut StepBudget::for_shape("remove_small_walls", shape),
        )?;
        let cave_size =
            remove_other_caves(&mut level, &mut StepBudget::for_shape("remove_other_caves", shape))?;
        if !self.config.cave_is_large_enough(cave_size) {
            return Ok(Attempt::Rejected { cave_size, next_seed: Seed::Number(rng.random()) });
        }

        fill_small_caves(&mut level, &mut StepBudget::for_shape("fill_small_caves", shape))?;
        let openness = measure_openness(&level);
        grow_grass(&mut level, &openness, &noise, &self.config);
        level.set_openness(openness);
        Ok(Attempt::Accepted(level))
    }
}
