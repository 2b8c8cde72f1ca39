//! Tunables for level generation. Defaults reproduce the reference levels.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::{DEFAULT_HEIGHT, DEFAULT_WIDTH, GridShape};

/// Smallest grid that still has an inner region around a start tile.
pub const MIN_GRID_SIDE: i32 = 5;
/// Keeps `width * height` and every position index well inside `i32`.
pub const MAX_GRID_SIDE: i32 = 1024;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub width: i32,
    pub height: i32,
    /// Attempts before generation gives up on finding a large enough cave.
    pub max_attempts: u32,
    /// The main cave must cover at least `width * height / min_cave_divisor` tiles.
    pub min_cave_divisor: u32,
    /// Wall groups with fewer tiles than this are opened up.
    pub small_wall_limit: usize,
    pub tall_grass_threshold: u32,
    pub short_grass_threshold: u32,
    pub noise_zoom: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_attempts: 1000,
            min_cave_divisor: 4,
            small_wall_limit: 6,
            tall_grass_threshold: 40,
            short_grass_threshold: 60,
            noise_zoom: 10.0,
        }
    }
}

impl GenerationConfig {
    pub fn shape(&self) -> GridShape {
        GridShape::new(self.width, self.height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_GRID_SIDE || self.height < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_GRID_SIDE,
            });
        }
        if self.width > MAX_GRID_SIDE || self.height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_GRID_SIDE,
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroLimit { field: "max_attempts" });
        }
        if self.min_cave_divisor == 0 {
            return Err(ConfigError::ZeroLimit { field: "min_cave_divisor" });
        }
        let inner = self.shape().inner_positions().count();
        if !self.cave_is_large_enough(inner) {
            return Err(ConfigError::CaveCannotFit { inner, required: self.min_cave_size() });
        }
        if self.tall_grass_threshold > self.short_grass_threshold {
            return Err(ConfigError::GrassThresholdsInverted {
                tall: self.tall_grass_threshold,
                short: self.short_grass_threshold,
            });
        }
        if !self.noise_zoom.is_finite() || self.noise_zoom <= 0.0 {
            return Err(ConfigError::NoiseZoom(self.noise_zoom.to_string()));
        }
        Ok(())
    }

    /// Fewest tiles a main cave may have.
    pub fn min_cave_size(&self) -> usize {
        let area = i64::from(self.width) * i64::from(self.height);
        let divisor = i64::from(self.min_cave_divisor.max(1));
        usize::try_from((area + divisor - 1) / divisor).unwrap_or(usize::MAX)
    }

    /// Whether a main cave of `size` tiles is large enough to keep.
    pub fn cave_is_large_enough(&self, size: usize) -> bool {
        let area = i64::from(self.width) * i64::from(self.height);
        let size = i64::try_from(size).unwrap_or(i64::MAX);
        size.saturating_mul(i64::from(self.min_cave_divisor)) >= area
    }
}
