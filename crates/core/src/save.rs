//! JSON save files for a running [`World`].
//!
//! The file carries a SHA-256 of the compact JSON form of the world, so a
//! hand-edited or truncated save is refused instead of resumed.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::SaveError;
use crate::seed::Seed;
use crate::world::World;

pub const SAVE_FORMAT_VERSION: u16 = 1;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SaveFile {
    pub format_version: u16,
    pub seed: Seed,
    pub sha256_hex: String,
    pub world: World,
}

/// Read before the rest so an old format fails on its version alone.
#[derive(Deserialize)]
struct SaveHeader {
    format_version: u16,
}

fn world_sha256(world: &World) -> Result<String, SaveError> {
    let body = serde_json::to_string(world)?;
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    let result = hasher.finalize();
    Ok(format!("{result:064x}"))
}

impl SaveFile {
    pub fn from_world(world: &World) -> Result<Self, SaveError> {
        Ok(Self {
            format_version: SAVE_FORMAT_VERSION,
            seed: world.seed().clone(),
            sha256_hex: world_sha256(world)?,
            world: world.clone(),
        })
    }

    pub fn write_atomic(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        info!("saved world for seed {} to {}", self.seed, path.display());
        Ok(())
    }

    /// Reads and validates a save file.
    pub fn load(path: &Path) -> Result<Self, SaveError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, SaveError> {
        let header: SaveHeader = serde_json::from_str(content)?;
        if header.format_version != SAVE_FORMAT_VERSION {
            return Err(SaveError::UnsupportedVersion {
                found: header.format_version,
                expected: SAVE_FORMAT_VERSION,
            });
        }

        let save: Self = serde_json::from_str(content)?;
        let computed = world_sha256(&save.world)?;
        if !save.sha256_hex.eq_ignore_ascii_case(&computed) {
            return Err(SaveError::ChecksumMismatch { recorded: save.sha256_hex, computed });
        }
        if save.seed != *save.world.seed() {
            return Err(SaveError::SeedMismatch {
                header: save.seed,
                world: save.world.seed().clone(),
            });
        }
        save.world.check_consistency()?;
        Ok(save)
    }

    pub fn into_world(self) -> World {
        self.world
    }
}
