//! Per-actor turn logic.

use log::debug;
use serde::{Deserialize, Serialize};

use super::World;
use crate::types::{Direction, EntityId, TileKind};

/// Delay a spike reports after each of its turns.
pub const SPIKE_DELAY: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Player,
    /// Regrows trampled grass; has no position.
    Environment,
    Spike { velocity: Direction },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The player is at the front of the schedule.
    AwaitInput,
    /// Time the actor's turn took.
    Delay(u32),
}

impl World {
    pub(super) fn player_turn(&mut self) -> StepOutcome {
        if !self.vision.is_visible(self.player_pos()) {
            self.look();
        }
        StepOutcome::AwaitInput
    }

    pub(super) fn environment_turn(&mut self) -> StepOutcome {
        let level = &mut self.level;
        let mut regrown = 0;
        self.grass_delay.retain(|&pos, delay| {
            if !level.is(pos, TileKind::ShortGrass) {
                return false;
            }
            *delay = delay.saturating_sub(1);
            if *delay > 0 {
                return true;
            }
            level.set_tile(pos, TileKind::TallGrass);
            regrown += 1;
            false
        });
        if regrown > 0 {
            debug!("{regrown} grass tile(s) grew back");
        }
        self.schedule.reschedule();
        StepOutcome::Delay(0)
    }

    /// A spike stays at the front of the schedule while it keeps moving.
    pub(super) fn spike_turn(&mut self, id: EntityId, velocity: Direction) -> StepOutcome {
        let shape = self.level.shape();
        let pos = self.entities.get(id).and_then(|entity| entity.pos);
        match pos {
            Some(pos) if self.level.passable(pos) => {
                self.level.set_tile(pos, TileKind::Spikes);
                if let Some(entity) = self.entities.get_mut(id) {
                    entity.pos = Some(shape.step(pos, velocity));
                }
                self.look();
            }
            _ => {
                self.schedule.unschedule();
                self.entities.remove(id);
                debug!("spike {id:?} stopped");
            }
        }
        StepOutcome::Delay(SPIKE_DELAY)
    }
}
