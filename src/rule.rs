//! Declarative terrain rules
//!
//! A [`TerrainRule`] describes one layer of the map: what it paints (obstacle
//! or terrain), how its region is shaped ([`GrowthMode`]) and which existing
//! cells it is allowed to overwrite.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::grid::TileColor;

/// Parameters for uniform scatter
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticParams {
    /// Probability that any single eligible cell is claimed
    pub chance: f32,
}

impl Default for StaticParams {
    fn default() -> Self {
        Self { chance: 0.1 }
    }
}

/// Parameters for blob growth
///
/// The number of blobs is derived from the rule's coverage:
/// `clamp(round(coverage * cell_count) / avg_size, min_blobs, max_blobs)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobParams {
    /// Average cells per blob
    pub avg_size: u32,
    /// Each blob's size is `avg_size` +/- up to this many cells
    pub size_jitter: u32,
    /// Lower bound on the blob count
    pub min_blobs: u32,
    /// Upper bound on the blob count
    pub max_blobs: u32,
    /// Probability that a frontier neighbour joins the blob
    pub grow_chance: f32,
    /// Concavity-filling passes run after growth (ignore the size cap)
    pub smoothing_passes: u32,
    /// Random probes per blob when looking for a seed cell
    pub seed_attempts: u32,
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            avg_size: 60,
            size_jitter: 20,
            min_blobs: 1,
            max_blobs: 12,
            grow_chance: 0.65,
            smoothing_passes: 1,
            seed_attempts: 64,
        }
    }
}

/// Parameters for branching fractal paths
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LichtenbergParams {
    /// Global step budget shared by all walkers (the start cell is step one)
    pub max_steps: u32,
    /// Maximum number of concurrent walkers
    pub max_walkers: u32,
    /// Probability that a walker spawns a branch after a step
    pub branch_chance: f32,
    /// Probability of preferring a step toward the target
    pub toward_target_bias: f32,
    /// Thickening passes adding orthogonal neighbours of the path
    pub widen_passes: u32,
    /// Random probes when picking the start and target edge cells
    pub endpoint_attempts: u32,
}

impl Default for LichtenbergParams {
    fn default() -> Self {
        Self {
            max_steps: 400,
            max_walkers: 6,
            branch_chance: 0.08,
            toward_target_bias: 0.7,
            widen_passes: 0,
            endpoint_attempts: 64,
        }
    }
}

/// How a rule shapes the region it claims
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthMode {
    /// Independent per-cell coin flips, no spatial coherence
    Static(StaticParams),
    /// Organic blobs grown from random seeds
    Blob(BlobParams),
    /// Branching random walks between two edge cells
    Lichtenberg(LichtenbergParams),
}

impl GrowthMode {
    /// Human-readable mode name
    pub fn name(&self) -> &'static str {
        match self {
            GrowthMode::Static(_) => "Static",
            GrowthMode::Blob(_) => "Blob",
            GrowthMode::Lichtenberg(_) => "Lichtenberg",
        }
    }
}

impl Default for GrowthMode {
    fn default() -> Self {
        GrowthMode::Static(StaticParams::default())
    }
}

/// A single generation rule
///
/// Rules are applied in ascending `order` (ties keep their input order).
/// Obstacle rules run first and are subject to the reachability check;
/// terrain rules are layered on top of the accepted obstacle layout.
///
/// # Overwrite policy
///
/// A cell is eligible for a rule when:
/// - it is unblocked, or `allow_overwrite_obstacle` is set, and
/// - it still carries the base terrain id, unless `only_affect_base` is off
///   *and* `allow_overwrite_terrain` is on.
///
/// Seed and anchor cells must additionally be unblocked when
/// `force_unblocked_seed` is set.
///
/// # Example
///
/// ```rust
/// use rust_tile_terrain::*;
///
/// let rocks = TerrainRule::obstacle("Rocks")
///     .with_mode(GrowthMode::Blob(BlobParams::default()))
///     .with_coverage(0.15)
///     .with_order(1);
///
/// let mud = TerrainRule::terrain("Mud", 3)
///     .with_color([90, 70, 40, 255])
///     .only_affect_base(false)
///     .allow_overwrite_terrain(true)
///     .with_order(2);
///
/// assert!(rocks.validate().is_ok());
/// assert!(mud.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainRule {
    /// Name used in logs and tooling
    pub display_name: String,
    /// Color painted onto claimed cells
    pub color: TileColor,
    /// Movement cost for terrain rules (obstacles always write 0)
    pub cost: u8,
    /// Obstacle rules block cells; terrain rules classify them
    pub is_obstacle: bool,
    /// Require seed/anchor cells to be unblocked
    pub force_unblocked_seed: bool,
    /// Region shape and its parameters
    pub mode: GrowthMode,
    /// Fraction of the grid the rule aims to cover (drives blob count)
    pub coverage_percent: f32,
    /// May claim blocked cells
    pub allow_overwrite_obstacle: bool,
    /// Only claim cells still carrying the base terrain id
    pub only_affect_base: bool,
    /// May claim cells owned by another terrain rule (needs `only_affect_base` off)
    pub allow_overwrite_terrain: bool,
    /// Application order, 1-based
    pub order: u32,
}

impl Default for TerrainRule {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            color: [255, 255, 255, 255],
            cost: 1,
            is_obstacle: false,
            force_unblocked_seed: true,
            mode: GrowthMode::default(),
            coverage_percent: 0.1,
            allow_overwrite_obstacle: false,
            only_affect_base: true,
            allow_overwrite_terrain: false,
            order: 1,
        }
    }
}

impl TerrainRule {
    /// Create an obstacle rule with default settings
    pub fn obstacle(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            color: [40, 40, 40, 255],
            cost: 0,
            is_obstacle: true,
            ..Default::default()
        }
    }

    /// Create a terrain rule with the given movement cost
    pub fn terrain(display_name: impl Into<String>, cost: u8) -> Self {
        Self {
            display_name: display_name.into(),
            cost,
            ..Default::default()
        }
    }

    /// Set the painted color
    pub fn with_color(mut self, color: TileColor) -> Self {
        self.color = color;
        self
    }

    /// Set the movement cost
    pub fn with_cost(mut self, cost: u8) -> Self {
        self.cost = cost;
        self
    }

    /// Set the growth mode
    pub fn with_mode(mut self, mode: GrowthMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the coverage fraction
    pub fn with_coverage(mut self, coverage_percent: f32) -> Self {
        self.coverage_percent = coverage_percent;
        self
    }

    /// Set the application order
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// Allow or forbid claiming blocked cells
    pub fn allow_overwrite_obstacle(mut self, allow: bool) -> Self {
        self.allow_overwrite_obstacle = allow;
        self
    }

    /// Restrict the rule to base cells
    pub fn only_affect_base(mut self, only_base: bool) -> Self {
        self.only_affect_base = only_base;
        self
    }

    /// Allow or forbid claiming cells owned by another terrain rule
    pub fn allow_overwrite_terrain(mut self, allow: bool) -> Self {
        self.allow_overwrite_terrain = allow;
        self
    }

    /// Require seed cells to be unblocked
    pub fn force_unblocked_seed(mut self, force: bool) -> Self {
        self.force_unblocked_seed = force;
        self
    }

    /// Check that every numeric setting is in range
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        check_fraction(&self.display_name, "coverage_percent", self.coverage_percent)?;
        if self.order < 1 {
            return Err(self.invalid("order must be >= 1 (got 0)".to_string()));
        }

        match &self.mode {
            GrowthMode::Static(params) => {
                check_fraction(&self.display_name, "chance", params.chance)?;
            }
            GrowthMode::Blob(params) => {
                check_fraction(&self.display_name, "grow_chance", params.grow_chance)?;
                if params.avg_size == 0 {
                    return Err(self.invalid("blob avg_size must be >= 1".to_string()));
                }
                if params.min_blobs > params.max_blobs {
                    return Err(self.invalid(format!(
                        "min_blobs ({}) exceeds max_blobs ({})",
                        params.min_blobs, params.max_blobs
                    )));
                }
            }
            GrowthMode::Lichtenberg(params) => {
                check_fraction(&self.display_name, "branch_chance", params.branch_chance)?;
                let bias = params.toward_target_bias;
                check_fraction(&self.display_name, "toward_target_bias", bias)?;
                if params.max_walkers == 0 {
                    return Err(self.invalid("max_walkers must be >= 1".to_string()));
                }
            }
        }
        Ok(())
    }

    fn invalid(&self, msg: String) -> TerrainError {
        TerrainError::InvalidConfig(format!("rule '{}': {}", self.display_name, msg))
    }
}

fn check_fraction(rule: &str, field: &str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(TerrainError::InvalidConfig(format!(
            "rule '{}': {} must be within [0, 1] (got {})",
            rule, field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_base_only() {
        let rule = TerrainRule::terrain("Grass", 2);
        assert!(rule.only_affect_base);
        assert!(!rule.allow_overwrite_terrain);
        assert!(!rule.allow_overwrite_obstacle);
        assert!(rule.force_unblocked_seed);
        assert!(!rule.is_obstacle);
        assert_eq!(rule.cost, 2);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_obstacle_constructor() {
        let rule = TerrainRule::obstacle("Wall");
        assert!(rule.is_obstacle);
        assert_eq!(rule.cost, 0);
        assert_eq!(rule.display_name, "Wall");
    }

    #[test]
    fn test_with_cost_overrides_constructor_cost() {
        let rule = TerrainRule::terrain("Ice", 2).with_cost(7);
        assert_eq!(rule.cost, 7);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(TerrainRule::obstacle("a").with_coverage(1.5).validate().is_err());
        assert!(TerrainRule::obstacle("a").with_coverage(f32::NAN).validate().is_err());
        assert!(TerrainRule::obstacle("a").with_order(0).validate().is_err());

        let bad_chance = TerrainRule::obstacle("a")
            .with_mode(GrowthMode::Static(StaticParams { chance: -0.1 }));
        assert!(bad_chance.validate().is_err());

        let bad_blobs = TerrainRule::obstacle("a").with_mode(GrowthMode::Blob(BlobParams {
            min_blobs: 5,
            max_blobs: 2,
            ..Default::default()
        }));
        assert!(bad_blobs.validate().is_err());

        let no_walkers = TerrainRule::obstacle("a").with_mode(GrowthMode::Lichtenberg(
            LichtenbergParams {
                max_walkers: 0,
                ..Default::default()
            },
        ));
        assert!(no_walkers.validate().is_err());
    }

    #[test]
    fn test_validate_error_names_rule() {
        let err = TerrainRule::obstacle("Lava").with_coverage(2.0).validate().unwrap_err();
        assert!(err.to_string().contains("Lava"));
        assert!(err.to_string().contains("coverage_percent"));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(GrowthMode::default().name(), "Static");
        assert_eq!(GrowthMode::Blob(BlobParams::default()).name(), "Blob");
        assert_eq!(
            GrowthMode::Lichtenberg(LichtenbergParams::default()).name(),
            "Lichtenberg"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_rule_serialization() {
        let rule = TerrainRule::obstacle("Cliffs")
            .with_mode(GrowthMode::Lichtenberg(LichtenbergParams::default()))
            .with_order(3);

        let json = serde_json::to_string(&rule).unwrap();
        let restored: TerrainRule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, restored);
    }
}
