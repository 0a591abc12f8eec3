//! Error types for tile grid generation

use thiserror::Error;

/// Errors that can occur while configuring, generating or querying a tile grid
///
/// A generation run that never meets its reachability threshold is *not* an
/// error: see [`GenerationReport::accepted`](crate::GenerationReport::accepted).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerrainError {
    /// Grid dimensions, backing arrays, rules or generation settings are invalid
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A coordinate outside the grid was passed to an index-producing operation
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        /// Requested column
        x: i32,
        /// Requested row
        y: i32,
        /// Grid width
        width: i32,
        /// Grid height
        height: i32,
    },
}

/// Result type alias for tile terrain operations
pub type Result<T> = std::result::Result<T, TerrainError>;
