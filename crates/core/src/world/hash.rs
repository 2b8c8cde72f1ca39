//! Stable snapshot hashing for deterministic verification.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::{Behavior, World};

impl World {
    /// Hash of everything that decides how the world plays on from here.
    /// Entity ids are left out; actors are hashed in schedule order.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write(self.seed.hash_text().as_bytes());
        hasher.write_u64(self.level.fingerprint());
        for word in self.rng.state_words() {
            hasher.write_u64(word);
        }

        hasher.write_i32(self.player_pos().0);
        hasher.write_usize(self.schedule.len());
        for id in self.schedule.iter() {
            let Some(entity) = self.entities.get(id) else {
                hasher.write_u8(u8::MAX);
                continue;
            };
            match entity.behavior {
                Behavior::Player => hasher.write_u8(0),
                Behavior::Environment => hasher.write_u8(1),
                Behavior::Spike { velocity } => {
                    hasher.write_u8(2);
                    hasher.write_u8(velocity.index() as u8);
                }
            }
            hasher.write_i32(entity.pos.map_or(i32::MIN, |pos| pos.0));
        }

        for (pos, delay) in &self.grass_delay {
            hasher.write_i32(pos.0);
            hasher.write_u32(*delay);
        }
        hasher.write_usize(self.vision.visible().len());
        hasher.write_usize(self.vision.memory().len());
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::types::Direction;
    use crate::world::test_support::meadow;

    #[test]
    fn clones_hash_alike_until_they_diverge() {
        let mut world = meadow(&[]);
        let mut twin = world.clone();
        assert_eq!(world.snapshot_hash(), twin.snapshot_hash());

        assert_eq!(world.move_player(Direction::East), Ok(true));
        assert_ne!(world.snapshot_hash(), twin.snapshot_hash());

        assert_eq!(twin.move_player(Direction::East), Ok(true));
        assert_eq!(world.snapshot_hash(), twin.snapshot_hash());
    }

    #[test]
    fn a_queued_spike_changes_the_hash() {
        let mut world = meadow(&[]);
        let before = world.snapshot_hash();
        world.cast_spike().expect("player's turn");
        assert_ne!(world.snapshot_hash(), before);
    }
}
