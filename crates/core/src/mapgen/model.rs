//! Public result of a generation run.

use crate::level::Level;
use crate::seed::Seed;
use crate::types::Pos;

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedLevel {
    pub level: Level,
    /// Seed of the attempt that succeeded. Equal to the requested seed unless
    /// earlier attempts were discarded.
    pub final_seed: Seed,
    /// Attempts made, counting the successful one.
    pub attempts: u32,
}

/// Two consecutive levels joined by stairs at the same position.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkedLevels {
    /// Holds the down staircase.
    pub upper: GeneratedLevel,
    /// Holds the up staircase.
    pub lower: GeneratedLevel,
    pub stairs: Pos,
    /// Lower levels generated before one shared a stair site with the upper.
    pub lower_attempts: u32,
}
