//! A small turn-based world on top of a generated level.
//!
//! Actors take turns from a queue. The player waits for input, the
//! environment regrows trampled grass, and spikes travel in a straight line
//! until something stops them.

pub mod behavior;
mod hash;
mod schedule;
#[cfg(test)]
pub(crate) mod test_support;

use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

pub use behavior::{Behavior, SPIKE_DELAY, StepOutcome};
pub use schedule::Schedule;

use crate::config::GenerationConfig;
use crate::error::{ActionError, ConsistencyError, GenerationError};
use crate::level::Level;
use crate::mapgen::MapGenerator;
use crate::rng::Alea;
use crate::seed::Seed;
use crate::types::{Direction, EntityId, Pos, TileKind};
use crate::visibility::VisibilityTracker;

/// Turns before trampled grass stands up again, inclusive.
pub const TRAMPLE_DELAY: (i32, i32) = (3, 5);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// `None` for actors that have no place on the map.
    pub pos: Option<Pos>,
    pub behavior: Behavior,
}

/// What a bounded run of [`World::run_until_input`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    /// Sum of the delays returned by non-player actors.
    pub elapsed: u32,
    pub awaiting_input: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct World {
    seed: Seed,
    config: GenerationConfig,
    generation_attempts: u32,
    level: Level,
    entities: SlotMap<EntityId, Entity>,
    player: EntityId,
    occupants: BTreeMap<Pos, EntityId>,
    schedule: Schedule,
    grass_delay: BTreeMap<Pos, u32>,
    vision: VisibilityTracker,
    rng: Alea,
}

impl World {
    /// Generates a level for `seed` with the start at the grid centre and
    /// places the player there.
    pub fn new(seed: impl Into<Seed>, config: &GenerationConfig) -> Result<Self, GenerationError> {
        let seed = seed.into();
        let start = config.shape().xy2pos(config.width / 2, config.height / 2);
        let generated = MapGenerator::new(config.clone()).generate(seed.clone(), start)?;
        info!(
            "world for seed {seed}: {} attempt(s), player at {}",
            generated.attempts,
            generated.level.start()
        );
        Ok(Self::from_level(seed, config.clone(), generated.level, generated.attempts))
    }

    pub(crate) fn from_level(
        seed: Seed,
        config: GenerationConfig,
        level: Level,
        generation_attempts: u32,
    ) -> Self {
        let mut entities = SlotMap::with_key();
        let player =
            entities.insert(Entity { pos: Some(level.start()), behavior: Behavior::Player });
        let environment = entities.insert(Entity { pos: None, behavior: Behavior::Environment });
        let occupants = BTreeMap::from([(level.start(), player)]);
        Self {
            rng: Alea::new(seed.clone()),
            seed,
            config,
            generation_attempts,
            level,
            entities,
            player,
            occupants,
            schedule: Schedule::new([player, environment]),
            grass_delay: BTreeMap::new(),
            vision: VisibilityTracker::new(),
        }
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn generation_attempts(&self) -> u32 {
        self.generation_attempts
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn player_pos(&self) -> Pos {
        self.entities
            .get(self.player)
            .and_then(|entity| entity.pos)
            .unwrap_or_else(|| self.level.start())
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities.iter()
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn current_actor(&self) -> Option<EntityId> {
        self.schedule.current()
    }

    pub fn is_players_turn(&self) -> bool {
        self.schedule.current() == Some(self.player)
    }

    pub fn vision(&self) -> &VisibilityTracker {
        &self.vision
    }

    /// Turns left before the short grass at `pos` grows tall again.
    pub fn grass_delay(&self, pos: Pos) -> Option<u32> {
        self.grass_delay.get(&pos).copied()
    }

    pub fn grass_delays(&self) -> &BTreeMap<Pos, u32> {
        &self.grass_delay
    }

    /// Runs the actor at the front of the schedule once.
    pub fn step(&mut self) -> StepOutcome {
        let Some(actor) = self.schedule.current() else {
            return StepOutcome::AwaitInput;
        };
        let Some(behavior) = self.entities.get(actor).map(|entity| entity.behavior) else {
            debug!("dropping stale actor {actor:?} from the schedule");
            self.schedule.unschedule();
            return StepOutcome::Delay(0);
        };
        match behavior {
            Behavior::Player => self.player_turn(),
            Behavior::Environment => self.environment_turn(),
            Behavior::Spike { velocity } => self.spike_turn(actor, velocity),
        }
    }

    /// Steps until the player is waiting for input, or `max_steps` ran out.
    pub fn run_until_input(&mut self, max_steps: usize) -> RunSummary {
        let mut summary = RunSummary::default();
        while summary.steps < max_steps {
            summary.steps += 1;
            match self.step() {
                StepOutcome::AwaitInput => {
                    summary.awaiting_input = true;
                    break;
                }
                StepOutcome::Delay(delay) => summary.elapsed += delay,
            }
        }
        summary
    }

    /// Walks the player one tile. Bumping into a wall or another actor still
    /// spends the turn. Returns whether the player moved.
    pub fn move_player(&mut self, direction: Direction) -> Result<bool, ActionError> {
        self.ensure_players_turn()?;
        let target = self.level.shape().step(self.player_pos(), direction);
        let moved = self.walk(self.player, target);
        self.look();
        self.schedule.reschedule();
        Ok(moved)
    }

    /// Ends the player's turn by launching a spike eastward from the tile
    /// next to the player. The spike acts before anyone else.
    pub fn cast_spike(&mut self) -> Result<EntityId, ActionError> {
        self.ensure_players_turn()?;
        self.schedule.reschedule();
        let velocity = Direction::East;
        let pos = self.level.shape().step(self.player_pos(), velocity);
        let spike = self.entities.insert(Entity {
            pos: Some(pos),
            behavior: Behavior::Spike { velocity },
        });
        self.schedule.push_front(spike);
        debug!("spike {spike:?} launched at {pos}");
        Ok(spike)
    }

    /// Checks the cross-references a save file could break.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        let shape = self.level.shape();
        if shape != self.config.shape() {
            return Err(ConsistencyError::ShapeMismatch {
                level: (shape.width, shape.height),
                config: (self.config.width, self.config.height),
            });
        }
        let player = self.entities.get(self.player).ok_or(ConsistencyError::MissingPlayer)?;
        if player.behavior != Behavior::Player {
            return Err(ConsistencyError::PlayerBehavior);
        }
        let pos = player.pos.ok_or(ConsistencyError::UnplacedPlayer)?;
        if !self.level.passable(pos) {
            return Err(ConsistencyError::PlayerBlocked { pos });
        }
        if self.occupants.get(&pos) != Some(&self.player) {
            return Err(ConsistencyError::OccupancyMismatch { pos });
        }
        if let Some(id) = self.schedule.iter().find(|&id| !self.entities.contains_key(id)) {
            return Err(ConsistencyError::ScheduledMissing { id });
        }
        if let Some((id, _)) = self.entities.iter().find(|&(id, _)| !self.schedule.contains(id)) {
            return Err(ConsistencyError::Unscheduled { id });
        }
        if let Some(&pos) = self.vision.memory().keys().find(|&&pos| !shape.in_bounds(pos)) {
            return Err(ConsistencyError::MemoryOutOfBounds { pos });
        }
        Ok(())
    }

    fn ensure_players_turn(&self) -> Result<(), ActionError> {
        if self.is_players_turn() { Ok(()) } else { Err(ActionError::NotPlayersTurn) }
    }

    fn look(&mut self) {
        let observer = self.player_pos();
        self.vision.look(&self.level, observer);
    }

    fn walk(&mut self, id: EntityId, target: Pos) -> bool {
        if !self.level.passable(target) || self.occupants.contains_key(&target) {
            return false;
        }
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        if let Some(from) = entity.pos.replace(target) {
            self.occupants.remove(&from);
        }
        self.occupants.insert(target, id);

        if self.level.is(target, TileKind::TallGrass) {
            self.level.set_tile(target, TileKind::ShortGrass);
            let (min, max) = TRAMPLE_DELAY;
            let delay = self.rng.randint(min, max).unsigned_abs();
            self.grass_delay.insert(target, delay);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::test_support::meadow;

    #[test]
    fn new_world_starts_on_the_players_turn() {
        let mut world = World::new(12345, &GenerationConfig::default()).expect("world");
        let shape = world.level().shape();
        assert_eq!(world.player_pos(), shape.xy2pos(24, 15));
        assert_eq!(world.generation_attempts(), 1);
        assert!(world.is_players_turn());
        assert_eq!(world.schedule().len(), 2);
        assert!(!world.vision().has_view());

        assert_eq!(world.step(), StepOutcome::AwaitInput);
        assert!(world.vision().is_visible(world.player_pos()));
        assert_eq!(world.check_consistency(), Ok(()));
    }

    #[test]
    fn moving_updates_position_and_hands_the_turn_on() {
        let mut world = meadow(&[]);
        let shape = world.level().shape();
        assert_eq!(world.move_player(Direction::East), Ok(true));
        assert_eq!(world.player_pos(), shape.xy2pos(9, 6));
        assert!(!world.is_players_turn());
        assert_eq!(world.move_player(Direction::East), Err(ActionError::NotPlayersTurn));

        let summary = world.run_until_input(10);
        assert_eq!(summary, RunSummary { steps: 2, elapsed: 0, awaiting_input: true });
        assert_eq!(world.check_consistency(), Ok(()));
    }

    #[test]
    fn bumping_into_a_wall_spends_the_turn() {
        let mut world = meadow(&[((9, 6), TileKind::Wall)]);
        let start = world.player_pos();
        assert_eq!(world.move_player(Direction::East), Ok(false));
        assert_eq!(world.player_pos(), start);
        assert!(!world.is_players_turn());
    }

    #[test]
    fn trampled_grass_regrows_after_its_delay() {
        let mut world = meadow(&[((9, 6), TileKind::TallGrass), ((10, 6), TileKind::Wall)]);
        let grass = world.level().shape().xy2pos(9, 6);

        assert_eq!(world.move_player(Direction::East), Ok(true));
        assert!(world.level().is(grass, TileKind::ShortGrass));
        let delay = world.grass_delay(grass).expect("trampling sets a delay");
        assert!((3..=5).contains(&delay));

        for _ in 1..delay {
            assert_eq!(world.step(), StepOutcome::Delay(0));
            assert!(world.level().is(grass, TileKind::ShortGrass));
            assert_eq!(world.step(), StepOutcome::AwaitInput);
            assert_eq!(world.move_player(Direction::East), Ok(false));
        }
        assert_eq!(world.step(), StepOutcome::Delay(0));
        assert!(world.level().is(grass, TileKind::TallGrass));
        assert_eq!(world.grass_delay(grass), None);
    }

    #[test]
    fn spikes_run_east_until_the_wall() {
        let mut world = meadow(&[]);
        let shape = world.level().shape();
        let spike = world.cast_spike().expect("player's turn");
        assert_eq!(world.current_actor(), Some(spike));

        let summary = world.run_until_input(100);
        assert!(summary.awaiting_input);
        assert_eq!(world.entity(spike), None);
        assert_eq!(world.schedule().len(), 2);

        let mut pos = shape.step(world.player_pos(), Direction::East);
        let mut covered = 0;
        while shape.is_inner(pos) {
            assert_eq!(world.level().tile(pos), Some(TileKind::Spikes));
            covered += 1;
            pos = shape.step(pos, Direction::East);
        }
        assert!(covered > 0);
        assert_eq!(summary.elapsed, SPIKE_DELAY * (covered + 1));
        assert_eq!(world.level().tile(world.player_pos()), Some(TileKind::Floor));
        assert_eq!(world.check_consistency(), Ok(()));
    }

    #[test]
    fn a_spike_cast_against_a_wall_fizzles() {
        let mut world = meadow(&[((9, 6), TileKind::Wall)]);
        let spike = world.cast_spike().expect("player's turn");
        assert_eq!(world.step(), StepOutcome::Delay(SPIKE_DELAY));
        assert_eq!(world.entity(spike), None);
        assert_eq!(world.level().count(TileKind::Spikes), 0);
    }

    #[test]
    fn consistency_check_catches_a_misplaced_player() {
        let mut world = meadow(&[]);
        world.occupants.clear();
        assert_eq!(
            world.check_consistency(),
            Err(ConsistencyError::OccupancyMismatch { pos: world.player_pos() })
        );
    }

    #[test]
    fn consistency_check_catches_an_unscheduled_actor() {
        let mut world = meadow(&[]);
        let environment = world.schedule.iter().nth(1).expect("environment is scheduled");
        world.schedule = Schedule::new([world.player]);
        assert_eq!(
            world.check_consistency(),
            Err(ConsistencyError::Unscheduled { id: environment })
        );
    }
}
