//! Rule-driven generation pipeline
//!
//! Obstacle rules are applied first, as a whole layout, and retried until the
//! layout keeps enough of the map connected to the start cell. Terrain rules
//! are then layered on top of the accepted layout.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::GenerationConfig;
use crate::connectivity::{build_reachable_from, ReachabilityOracle};
use crate::error::Result;
use crate::generation::{grow_region, CellGate, GenerationContext};
use crate::goal::pick_random_reachable_goal;
use crate::grid::{TileGrid, BASE_TERRAIN_ID};
use crate::rule::TerrainRule;

/// Highest terrain id handed out to rules; later rules share the base id
pub const MAX_RULE_TERRAIN_ID: u8 = 254;

/// A rule paired with the terrain id derived from its sorted position
#[derive(Debug, Clone, Copy)]
pub struct PreparedRule<'a> {
    /// The rule itself
    pub rule: &'a TerrainRule,
    /// Id written into `terrain_id` by terrain rules
    pub terrain_id: u8,
}

/// Sort rules by `order` (stable) and assign terrain ids 1..=254
///
/// Rules past the 254th all receive [`BASE_TERRAIN_ID`].
pub fn prepare_rules(rules: &[TerrainRule]) -> Vec<PreparedRule<'_>> {
    let mut sorted: Vec<&TerrainRule> = rules.iter().collect();
    sorted.sort_by_key(|rule| rule.order);

    sorted
        .into_iter()
        .enumerate()
        .map(|(position, rule)| {
            let terrain_id = u8::try_from(position + 1)
                .ok()
                .filter(|&id| id <= MAX_RULE_TERRAIN_ID)
                .unwrap_or(BASE_TERRAIN_ID);
            PreparedRule { rule, terrain_id }
        })
        .collect()
}

/// Outcome of a generation run
///
/// The counts describe the obstacle layout of the final attempt, before
/// terrain rules ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    /// Attempts used (1-based)
    pub attempts: u32,
    /// `false` when the attempt budget ran out and the last layout was kept
    pub accepted: bool,
    /// Open cells after the obstacle phase
    pub walkable_count: usize,
    /// Open cells connected to the start cell
    pub reachable_count: usize,
    /// The start cell (grid center)
    pub start_index: usize,
}

impl GenerationReport {
    /// Fraction of open cells reachable from the start, 0.0 if none are open
    pub fn reachable_fraction(&self) -> f32 {
        if self.walkable_count == 0 {
            0.0
        } else {
            self.reachable_count as f32 / self.walkable_count as f32
        }
    }
}

/// Reusable grid generator
///
/// Owns the scratch buffers shared by every growth algorithm and the
/// connectivity validator. Keep one generator around and call
/// [`generate`](Self::generate) repeatedly; buffers are only reallocated when
/// the grid's cell count changes.
///
/// # Examples
///
/// ```
/// use rust_tile_terrain::*;
///
/// let mut grid = TileGrid::new(48, 32).unwrap();
/// let rules = vec![
///     TerrainRule::obstacle("Rocks")
///         .with_mode(GrowthMode::Blob(BlobParams::default()))
///         .with_coverage(0.2)
///         .with_order(1),
///     TerrainRule::terrain("Swamp", 4)
///         .with_color([60, 90, 50, 255])
///         .with_mode(GrowthMode::Static(StaticParams { chance: 0.1 }))
///         .with_order(2),
/// ];
/// let config = GenerationConfigBuilder::new()
///     .seed(42)
///     .min_reachable_percent(0.8)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let mut generator = TerrainGenerator::new();
/// let report = generator.generate(&mut grid, &rules, &config).unwrap();
/// if report.accepted {
///     assert!(report.reachable_fraction() >= 0.8);
/// }
/// assert!(!grid.blocked[report.start_index] || !report.accepted);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TerrainGenerator {
    ctx: GenerationContext,
    claimed: Vec<usize>,
}

impl TerrainGenerator {
    /// Create a generator with empty scratch buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild `grid` from `rules`, using the built-in flood fill for the
    /// reachability check
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the grid arrays do not match its dimensions,
    /// the config is out of range or any rule fails validation. Nothing is
    /// written in that case.
    ///
    /// Running out of attempts is not an error: the last layout is kept and
    /// the report has `accepted == false`.
    pub fn generate(
        &mut self,
        grid: &mut TileGrid,
        rules: &[TerrainRule],
        config: &GenerationConfig,
    ) -> Result<GenerationReport> {
        self.run(grid, rules, config, None)
    }

    /// Same as [`generate`](Self::generate), asking `oracle` for reachability
    pub fn generate_with_oracle(
        &mut self,
        grid: &mut TileGrid,
        rules: &[TerrainRule],
        config: &GenerationConfig,
        oracle: &mut dyn ReachabilityOracle,
    ) -> Result<GenerationReport> {
        self.run(grid, rules, config, Some(oracle))
    }

    fn run(
        &mut self,
        grid: &mut TileGrid,
        rules: &[TerrainRule],
        config: &GenerationConfig,
        mut oracle: Option<&mut dyn ReachabilityOracle>,
    ) -> Result<GenerationReport> {
        grid.validate()?;
        config.validate()?;
        for rule in rules {
            rule.validate()?;
        }

        self.ctx.ensure_size(grid.cell_count());
        let prepared = prepare_rules(rules);
        if rules.len() > usize::from(MAX_RULE_TERRAIN_ID) {
            tracing::debug!(
                rules = rules.len(),
                "more rules than terrain ids, later rules share the base id"
            );
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let start = grid.index().center_index();
        let mut report = GenerationReport {
            attempts: 0,
            accepted: false,
            walkable_count: 0,
            reachable_count: 0,
            start_index: start,
        };

        for attempt in 1..=config.max_attempts {
            report.attempts = attempt;
            grid.reset_to_base(config.base_walkable_cost, config.base_walkable_color);
            for entry in prepared.iter().filter(|entry| entry.rule.is_obstacle) {
                self.apply_rule(grid, entry, &mut rng);
            }

            report.walkable_count = grid.walkable_count();
            if grid.blocked[start] {
                report.reachable_count = 0;
                tracing::debug!(attempt, "start cell blocked, retrying");
                continue;
            }

            report.reachable_count = match oracle.as_mut() {
                Some(oracle) => oracle.reachable_count_from(grid, start),
                None => build_reachable_from(grid, start, &mut self.ctx),
            };
            let min_percent = config.min_reachable_percent;
            if meets_threshold(report.reachable_count, report.walkable_count, min_percent) {
                report.accepted = true;
                break;
            }
            tracing::debug!(
                attempt,
                reachable = report.reachable_count,
                walkable = report.walkable_count,
                "layout below reachability threshold, retrying"
            );
        }

        if report.accepted {
            tracing::info!(
                attempts = report.attempts,
                reachable = report.reachable_count,
                walkable = report.walkable_count,
                "obstacle layout accepted"
            );
        } else {
            tracing::warn!(
                attempts = report.attempts,
                fraction = report.reachable_fraction(),
                required = config.min_reachable_percent,
                "no layout met the reachability threshold, keeping the last one"
            );
        }

        grid.reset_walkable_to_base(config.base_walkable_cost, config.base_walkable_color);
        for entry in prepared.iter().filter(|entry| !entry.rule.is_obstacle) {
            self.apply_rule(grid, entry, &mut rng);
        }

        Ok(report)
    }

    fn apply_rule<R: Rng + ?Sized>(
        &mut self,
        grid: &mut TileGrid,
        entry: &PreparedRule<'_>,
        rng: &mut R,
    ) {
        let rule = entry.rule;
        self.claimed.clear();
        grow_region(rule, &CellGate::new(grid, rule), &mut self.ctx, rng, &mut self.claimed);

        for &cell in &self.claimed {
            if rule.is_obstacle {
                grid.blocked[cell] = true;
                grid.terrain_cost[cell] = 0;
                grid.terrain_id[cell] = BASE_TERRAIN_ID;
            } else {
                grid.terrain_cost[cell] = rule.cost;
                grid.terrain_id[cell] = entry.terrain_id;
                if rule.allow_overwrite_obstacle {
                    grid.blocked[cell] = false;
                }
            }
            grid.base_color[cell] = rule.color;
        }

        tracing::trace!(
            rule = %rule.display_name,
            mode = rule.mode.name(),
            cells = self.claimed.len(),
            "applied rule"
        );
    }

    /// Flood-fill from `start`; see [`build_reachable_from`]
    pub fn build_reachable_from(&mut self, grid: &TileGrid, start: usize) -> usize {
        build_reachable_from(grid, start, &mut self.ctx)
    }

    /// Whether `index` was reached by the most recent flood fill
    ///
    /// Only meaningful right after [`build_reachable_from`](Self::build_reachable_from)
    /// or [`pick_random_reachable_goal`](Self::pick_random_reachable_goal).
    pub fn is_reachable(&self, index: usize) -> bool {
        self.ctx.is_marked(index)
    }

    /// Pick a random goal reachable from `start`; see [`pick_random_reachable_goal`]
    pub fn pick_random_reachable_goal<R: Rng + ?Sized>(
        &mut self,
        grid: &TileGrid,
        start: usize,
        min_manhattan: u32,
        rng: &mut R,
    ) -> Option<usize> {
        pick_random_reachable_goal(grid, &mut self.ctx, start, min_manhattan, rng)
    }
}

fn meets_threshold(reachable: usize, walkable: usize, min_percent: f32) -> bool {
    walkable > 0 && reachable as f64 / walkable as f64 >= f64::from(min_percent)
}
