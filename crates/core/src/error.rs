use std::io;

use crate::seed::Seed;
use crate::types::{EntityId, Pos};

/// Why a level could not be produced.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Every attempt produced a main cave below the minimum size.
    #[error("no usable cave after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// A flood or dead-end cascade ran longer than the grid can justify.
    #[error("{phase} exceeded its budget of {budget} steps")]
    StepBudgetExceeded { phase: &'static str, budget: usize },

    #[error("grid {width}x{height} is too small to carve")]
    InvalidGrid { width: i32, height: i32 },

    #[error("start position {pos} is not inside the carvable region")]
    StartOutOfBounds { pos: Pos },

    #[error("invalid generation config: {0}")]
    Config(#[from] ConfigError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be at least {min}x{min}, got {width}x{height}")]
    GridTooSmall { width: i32, height: i32, min: i32 },

    #[error("grid must be at most {max}x{max}, got {width}x{height}")]
    GridTooLarge { width: i32, height: i32, max: i32 },

    #[error("inner region of {inner} tiles cannot hold a main cave of {required}")]
    CaveCannotFit { inner: usize, required: usize },

    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("tall grass threshold {tall} must not exceed short grass threshold {short}")]
    GrassThresholdsInverted { tall: u32, short: u32 },

    #[error("noise zoom must be a positive finite number, got {0}")]
    NoiseZoom(String),
}

/// Why a textual or serialized level could not be rebuilt.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelFormatError {
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: i32, found: usize },

    #[error("unknown glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: i32, y: i32 },

    #[error("no tile at ({x}, {y})")]
    MissingTile { x: i32, y: i32 },

    #[error("tile at ({x}, {y}) lies outside the playable region")]
    StrayTile { x: i32, y: i32 },

    #[error("openness map holds {found} cells, expected {expected}")]
    OpennessSize { expected: usize, found: usize },

    #[error("start position {pos} lies outside the playable region")]
    StartOutOfBounds { pos: Pos },

    #[error("grid {width}x{height} has no playable region")]
    EmptyGrid { width: i32, height: i32 },
}

#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save format version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },

    #[error("save checksum mismatch: recorded {recorded}, computed {computed}")]
    ChecksumMismatch { recorded: String, computed: String },

    #[error("header seed {header} does not match world seed {world}")]
    SeedMismatch { header: Seed, world: Seed },

    #[error("save data is inconsistent: {0}")]
    Corrupt(#[from] ConsistencyError),
}

/// A broken cross-reference inside a [`World`](crate::world::World).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("level is {}x{} but the config asks for {}x{}", level.0, level.1, config.0, config.1)]
    ShapeMismatch { level: (i32, i32), config: (i32, i32) },

    #[error("player entity is missing")]
    MissingPlayer,

    #[error("player entity has the wrong behavior")]
    PlayerBehavior,

    #[error("player has no position")]
    UnplacedPlayer,

    #[error("player stands on impassable tile {pos}")]
    PlayerBlocked { pos: Pos },

    #[error("occupancy map does not place the player at {pos}")]
    OccupancyMismatch { pos: Pos },

    #[error("schedule refers to missing entity {id:?}")]
    ScheduledMissing { id: EntityId },

    #[error("entity {id:?} is not scheduled")]
    Unscheduled { id: EntityId },

    #[error("memory holds out-of-bounds position {pos}")]
    MemoryOutOfBounds { pos: Pos },
}

/// Why a player action was refused.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    #[error("it is not the player's turn")]
    NotPlayersTurn,
}
