//! Rule-driven tile grid generation
//!
//! A standalone library for filling a rectangular tile grid with obstacles and
//! weighted terrain, while guaranteeing that enough of the map stays connected
//! to its center. Suitable for roguelikes, tactics maps and pathfinding demos.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_tile_terrain::*;
//!
//! let mut grid = TileGrid::new(64, 40).unwrap();
//! let rules = vec![
//!     TerrainRule::obstacle("Boulders")
//!         .with_mode(GrowthMode::Blob(BlobParams::default()))
//!         .with_coverage(0.15)
//!         .with_order(1),
//!     TerrainRule::obstacle("Chasm")
//!         .with_mode(GrowthMode::Lichtenberg(LichtenbergParams::default()))
//!         .with_order(2),
//!     TerrainRule::terrain("Mud", 3)
//!         .with_color([110, 85, 60, 255])
//!         .with_mode(GrowthMode::Static(StaticParams { chance: 0.08 }))
//!         .with_order(3),
//! ];
//!
//! let config = GenerationConfigBuilder::new()
//!     .seed(7)
//!     .max_attempts(40).unwrap()
//!     .min_reachable_percent(0.7).unwrap()
//!     .build().unwrap();
//!
//! let mut generator = TerrainGenerator::new();
//! let report = generator.generate(&mut grid, &rules, &config).unwrap();
//! println!(
//!     "attempt {}: {} of {} open cells reachable",
//!     report.attempts, report.reachable_count, report.walkable_count
//! );
//!
//! // pick somewhere to walk to
//! use rand::SeedableRng;
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
//! let goal = generator.pick_random_reachable_goal(&grid, report.start_index, 10, &mut rng);
//! if let Some(goal) = goal {
//!     assert!(generator.is_reachable(goal));
//! }
//! ```
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration, rules and grid dimensions

// Modules
pub mod error;
pub mod config;
pub mod grid;
pub mod rule;
pub mod generation;
pub mod connectivity;
pub mod goal;
pub mod pipeline;

// Re-export core types for convenience
pub use error::{TerrainError, Result};
pub use config::{GenerationConfig, GenerationConfigBuilder, MAX_ATTEMPTS_LIMIT};
pub use grid::{GridIndex, TileGrid, TileColor, BASE_TERRAIN_ID};
pub use rule::{TerrainRule, GrowthMode, StaticParams, BlobParams, LichtenbergParams};
pub use generation::{GenerationContext, CellGate, grow_region};
pub use connectivity::{build_reachable_from, ReachabilityOracle};
pub use goal::pick_random_reachable_goal;
pub use pipeline::{TerrainGenerator, GenerationReport, PreparedRule, prepare_rules};

// Re-export glam::IVec2 for convenience
pub use glam::IVec2;
