//! Generation settings and builder
//!
//! This module provides the run-level settings for deterministic grid generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::grid::TileColor;

/// Upper bound accepted by [`GenerationConfigBuilder::max_attempts`]
pub const MAX_ATTEMPTS_LIMIT: u32 = 10_000;

/// Settings for one generation run
///
/// The same configuration, grid size and rule list always produce the same grid.
///
/// # Example
///
/// ```rust
/// use rust_tile_terrain::*;
///
/// let config = GenerationConfigBuilder::new()
///     .seed(42)
///     .max_attempts(30)
///     .unwrap()
///     .min_reachable_percent(0.75)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.seed, 42);
/// assert_eq!(config.max_attempts, 30);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    /// Seed for the single random stream used by the whole run
    pub seed: u64,

    /// How many obstacle layouts to try before falling back
    ///
    /// When no layout meets `min_reachable_percent`, the last one is kept and
    /// terrain rules are still applied on top of it.
    pub max_attempts: u32,

    /// Minimum fraction of walkable cells that must be reachable from the start
    ///
    /// - 0.0: accept any layout whose start cell is open
    /// - 0.6: default
    /// - 1.0: every open cell must be connected
    pub min_reachable_percent: f32,

    /// Color of unclaimed walkable cells
    pub base_walkable_color: TileColor,

    /// Movement cost of unclaimed walkable cells
    pub base_walkable_cost: u8,
}

impl GenerationConfig {
    /// Re-check values that may have been edited after building
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `max_attempts` is out of range or
    /// `min_reachable_percent` is outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        check_attempts(self.max_attempts)?;
        check_percent(self.min_reachable_percent)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_reachable_percent: DEFAULT_MIN_REACHABLE,
            base_walkable_color: DEFAULT_BASE_COLOR,
            base_walkable_cost: 1,
        }
    }
}

const DEFAULT_MAX_ATTEMPTS: u32 = 25;
const DEFAULT_MIN_REACHABLE: f32 = 0.6;
const DEFAULT_BASE_COLOR: TileColor = [170, 190, 140, 255];

/// Builder for creating GenerationConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_tile_terrain::*;
///
/// // Use defaults (random seed)
/// let config = GenerationConfigBuilder::new().build().unwrap();
/// assert_eq!(config.max_attempts, 25);
///
/// // Customize
/// let config = GenerationConfigBuilder::new()
///     .seed(7)
///     .base_walkable_cost(2)
///     .base_walkable_color([0, 128, 0, 255])
///     .build()
///     .unwrap();
/// assert_eq!(config.base_walkable_cost, 2);
/// ```
#[derive(Debug, Clone)]
pub struct GenerationConfigBuilder {
    seed: Option<u64>,
    max_attempts: u32,
    min_reachable_percent: f32,
    base_walkable_color: TileColor,
    base_walkable_cost: u8,
}

impl GenerationConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - max_attempts: 25
    /// - min_reachable_percent: 0.6
    /// - base_walkable_color: pale green
    /// - base_walkable_cost: 1
    pub fn new() -> Self {
        Self {
            seed: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_reachable_percent: DEFAULT_MIN_REACHABLE,
            base_walkable_color: DEFAULT_BASE_COLOR,
            base_walkable_cost: 1,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the attempt budget for the obstacle phase
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if attempts is 0 or above [`MAX_ATTEMPTS_LIMIT`]
    pub fn max_attempts(mut self, attempts: u32) -> Result<Self> {
        check_attempts(attempts)?;
        self.max_attempts = attempts;
        Ok(self)
    }

    /// Set the reachability threshold
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if percent is outside `[0, 1]`
    pub fn min_reachable_percent(mut self, percent: f32) -> Result<Self> {
        check_percent(percent)?;
        self.min_reachable_percent = percent;
        Ok(self)
    }

    /// Set the color of unclaimed walkable cells
    pub fn base_walkable_color(mut self, color: TileColor) -> Self {
        self.base_walkable_color = color;
        self
    }

    /// Set the cost of unclaimed walkable cells
    pub fn base_walkable_cost(mut self, cost: u8) -> Self {
        self.base_walkable_cost = cost;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<GenerationConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(GenerationConfig {
            seed,
            max_attempts: self.max_attempts,
            min_reachable_percent: self.min_reachable_percent,
            base_walkable_color: self.base_walkable_color,
            base_walkable_cost: self.base_walkable_cost,
        })
    }
}

impl Default for GenerationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_attempts(attempts: u32) -> Result<()> {
    if attempts == 0 || attempts > MAX_ATTEMPTS_LIMIT {
        return Err(TerrainError::InvalidConfig(format!(
            "max attempts must be within 1..={} (got {})",
            MAX_ATTEMPTS_LIMIT, attempts
        )));
    }
    Ok(())
}

fn check_percent(percent: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&percent) {
        return Err(TerrainError::InvalidConfig(format!(
            "min reachable percent must be within [0, 1] (got {})",
            percent
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = GenerationConfigBuilder::new().build().unwrap();
        assert_eq!(config.max_attempts, 25);
        assert_eq!(config.min_reachable_percent, 0.6);
        assert_eq!(config.base_walkable_cost, 1);
    }

    #[test]
    fn test_builder_custom() {
        let config = GenerationConfigBuilder::new()
            .seed(99)
            .max_attempts(3)
            .unwrap()
            .min_reachable_percent(1.0)
            .unwrap()
            .base_walkable_color([1, 2, 3, 4])
            .base_walkable_cost(7)
            .build()
            .unwrap();

        assert_eq!(config.seed, 99);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.min_reachable_percent, 1.0);
        assert_eq!(config.base_walkable_color, [1, 2, 3, 4]);
        assert_eq!(config.base_walkable_cost, 7);
    }

    #[test]
    fn test_builder_invalid_attempts() {
        assert!(GenerationConfigBuilder::new().max_attempts(0).is_err());
        assert!(GenerationConfigBuilder::new().max_attempts(MAX_ATTEMPTS_LIMIT + 1).is_err());
        assert!(GenerationConfigBuilder::new().max_attempts(MAX_ATTEMPTS_LIMIT).is_ok());
    }

    #[test]
    fn test_builder_invalid_percent() {
        assert!(GenerationConfigBuilder::new().min_reachable_percent(-0.01).is_err());
        assert!(GenerationConfigBuilder::new().min_reachable_percent(1.01).is_err());
        assert!(GenerationConfigBuilder::new().min_reachable_percent(f32::NAN).is_err());
        assert!(GenerationConfigBuilder::new().min_reachable_percent(0.0).is_ok());
    }

    #[test]
    fn test_validate_catches_edited_fields() {
        let mut config = GenerationConfig::default();
        assert!(config.validate().is_ok());

        config.max_attempts = 0;
        assert!(config.validate().is_err());

        config.max_attempts = 5;
        config.min_reachable_percent = 3.0;
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = GenerationConfigBuilder::new().seed(12345).build().unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: GenerationConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
