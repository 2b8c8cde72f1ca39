//! What an observer sees now and what it remembers having seen.
//!
//! The live view stops at anything less than fully clear, while memory also
//! looks through dim tiles such as tall grass: the player remembers the
//! meadow beyond the grass without seeing what moves in it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::fov::shadowcast;
use crate::level::Level;
use crate::types::{Pos, TileKind, Transparency};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityTracker {
    fov: BTreeSet<Pos>,
    memory: BTreeMap<Pos, TileKind>,
}

impl VisibilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the view from `observer` and records every tile it can
    /// make out. The previous view is discarded; memory only grows or is
    /// overwritten with fresher tiles, and always covers the live view.
    pub fn look(&mut self, level: &Level, observer: Pos) {
        let shape = level.shape();
        let memory = &mut self.memory;
        shadowcast(
            shape,
            observer,
            |pos| level.transparency(pos) > Transparency::Opaque,
            |pos| {
                if let Some(kind) = level.tile(pos) {
                    memory.insert(pos, kind);
                }
            },
        );

        // The clear-only pass can reveal dim tiles at the edge of a sector
        // that the first pass scanned past, so it feeds memory too.
        let mut fov = BTreeSet::new();
        shadowcast(
            shape,
            observer,
            |pos| level.transparency(pos) == Transparency::Clear,
            |pos| {
                if let Some(kind) = level.tile(pos) {
                    memory.insert(pos, kind);
                }
                fov.insert(pos);
            },
        );
        self.fov = fov;
    }

    pub fn is_visible(&self, pos: Pos) -> bool {
        self.fov.contains(&pos)
    }

    pub fn visible(&self) -> &BTreeSet<Pos> {
        &self.fov
    }

    /// The tile last seen at `pos`, which may be stale.
    pub fn remembered(&self, pos: Pos) -> Option<TileKind> {
        self.memory.get(&pos).copied()
    }

    pub fn memory(&self) -> &BTreeMap<Pos, TileKind> {
        &self.memory
    }

    pub fn has_view(&self) -> bool {
        !self.fov.is_empty()
    }
}
