//! Tile grid storage and coordinate indexing
//!
//! The grid is stored as parallel arrays indexed by `x + y * width`, so every
//! algorithm in the crate works on plain `usize` cell indices.

use glam::IVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// RGBA8 color of a tile
pub type TileColor = [u8; 4];

/// Terrain id reserved for base (unclassified) cells
pub const BASE_TERRAIN_ID: u8 = 0;

/// The four axis-aligned neighbour offsets
pub const ORTHOGONAL_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// All eight neighbour offsets, orthogonal first
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Coordinate <-> linear index mapping for a `width x height` grid
///
/// The cell count is guaranteed to fit in an `i32`, so coordinate arithmetic
/// never overflows once a `GridIndex` exists.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridIndex {
    width: i32,
    height: i32,
}

impl GridIndex {
    /// Create an index for a `width x height` grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is not positive or if
    /// `width * height` overflows `i32`.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "grid dimensions must be positive (got {}x{})",
                width, height
            )));
        }
        if width.checked_mul(height).is_none() {
            return Err(TerrainError::InvalidConfig(format!(
                "grid of {}x{} cells overflows the addressable cell range",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Check whether `(x, y)` lies inside the grid
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Check whether `index` addresses a cell of this grid
    #[inline]
    pub fn is_valid_cell(&self, index: usize) -> bool {
        index < self.cell_count()
    }

    /// Convert `(x, y)` to a linear cell index
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the coordinate lies outside the grid.
    pub fn to_index(&self, x: i32, y: i32) -> Result<usize> {
        if !self.in_bounds(x, y) {
            return Err(TerrainError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((x + y * self.width) as usize)
    }

    /// Convert a linear cell index back to `(x, y)`
    ///
    /// The index must be valid for this grid; the result is meaningless otherwise.
    #[inline]
    pub fn index_to_xy(&self, index: usize) -> (i32, i32) {
        let index = index as i32;
        (index % self.width, index / self.width)
    }

    /// Same as [`index_to_xy`](Self::index_to_xy), as a vector
    #[inline]
    pub fn position(&self, index: usize) -> IVec2 {
        let (x, y) = self.index_to_xy(index);
        IVec2::new(x, y)
    }

    /// Index of the cell at `index + (dx, dy)`, or `None` if it falls off the grid
    #[inline]
    pub fn offset(&self, index: usize, dx: i32, dy: i32) -> Option<usize> {
        let (x, y) = self.index_to_xy(index);
        let (nx, ny) = (x + dx, y + dy);
        self.in_bounds(nx, ny).then(|| (nx + ny * self.width) as usize)
    }

    /// The canonical start cell, `(width / 2, height / 2)`
    #[inline]
    pub fn center_index(&self) -> usize {
        ((self.width / 2) + (self.height / 2) * self.width) as usize
    }

    /// Check whether a cell lies on the outer border
    pub fn is_edge(&self, index: usize) -> bool {
        let (x, y) = self.index_to_xy(index);
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    /// Manhattan distance between two valid cells
    pub fn manhattan(&self, a: usize, b: usize) -> u32 {
        let (ax, ay) = self.index_to_xy(a);
        let (bx, by) = self.index_to_xy(b);
        ax.abs_diff(bx) + ay.abs_diff(by)
    }
}

/// A rectangular tile grid with its per-cell backing arrays
///
/// The arrays are public so hosts can read (and paint from) them directly.
/// Every array must stay exactly `cell_count` long; generation checks this
/// before touching anything.
///
/// # Memory Usage
///
/// 7 bytes per cell (`bool` + two `u8` + RGBA8), so a 512x512 map is ~1.8 MB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    index: GridIndex,

    /// `true` = impassable
    pub blocked: Vec<bool>,

    /// Movement cost, only meaningful on unblocked cells
    pub terrain_cost: Vec<u8>,

    /// Which rule last claimed the cell (0 = base)
    pub terrain_id: Vec<u8>,

    /// Display color; the last rule to touch a cell wins
    pub base_color: Vec<TileColor>,
}

impl TileGrid {
    /// Allocate an open grid with zeroed cost, id and color
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for non-positive or overflowing dimensions.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let index = GridIndex::new(width, height)?;
        let cell_count = index.cell_count();
        Ok(Self {
            index,
            blocked: vec![false; cell_count],
            terrain_cost: vec![0; cell_count],
            terrain_id: vec![BASE_TERRAIN_ID; cell_count],
            base_color: vec![[0, 0, 0, 0]; cell_count],
        })
    }

    /// Adopt caller-owned backing arrays
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the dimensions are invalid or any array is
    /// not exactly `width * height` long.
    pub fn from_parts(
        width: i32,
        height: i32,
        blocked: Vec<bool>,
        terrain_cost: Vec<u8>,
        base_color: Vec<TileColor>,
        terrain_id: Vec<u8>,
    ) -> Result<Self> {
        let grid = Self {
            index: GridIndex::new(width, height)?,
            blocked,
            terrain_cost,
            terrain_id,
            base_color,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Hand the backing arrays back as `(blocked, terrain_cost, base_color, terrain_id)`
    pub fn into_parts(self) -> (Vec<bool>, Vec<u8>, Vec<TileColor>, Vec<u8>) {
        (self.blocked, self.terrain_cost, self.base_color, self.terrain_id)
    }

    /// Change the grid dimensions
    ///
    /// The arrays are only reallocated when the cell count changes; cell
    /// contents are unspecified afterwards until the next generation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for non-positive or overflowing dimensions.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        let index = GridIndex::new(width, height)?;
        let cell_count = index.cell_count();
        if cell_count != self.index.cell_count() {
            self.blocked = vec![false; cell_count];
            self.terrain_cost = vec![0; cell_count];
            self.terrain_id = vec![BASE_TERRAIN_ID; cell_count];
            self.base_color = vec![[0, 0, 0, 0]; cell_count];
        }
        self.index = index;
        Ok(())
    }

    /// Check that every backing array matches the cell count
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first mismatched array.
    pub fn validate(&self) -> Result<()> {
        let expected = self.index.cell_count();
        let lengths = [
            ("blocked", self.blocked.len()),
            ("terrain_cost", self.terrain_cost.len()),
            ("terrain_id", self.terrain_id.len()),
            ("base_color", self.base_color.len()),
        ];
        for (name, len) in lengths {
            if len != expected {
                return Err(TerrainError::InvalidConfig(format!(
                    "{} has {} entries, expected {} ({}x{})",
                    name,
                    len,
                    expected,
                    self.index.width(),
                    self.index.height()
                )));
            }
        }
        Ok(())
    }

    /// The coordinate mapping for this grid
    #[inline]
    pub fn index(&self) -> GridIndex {
        self.index
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> i32 {
        self.index.width()
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> i32 {
        self.index.height()
    }

    /// Total number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.index.cell_count()
    }

    /// Check whether a cell is blocked; invalid indices count as blocked
    #[inline]
    pub fn is_blocked(&self, index: usize) -> bool {
        self.blocked.get(index).copied().unwrap_or(true)
    }

    /// Number of unblocked cells
    pub fn walkable_count(&self) -> usize {
        self.blocked.iter().filter(|&&b| !b).count()
    }

    /// Number of cells currently carrying `terrain_id`
    pub fn count_terrain(&self, terrain_id: u8) -> usize {
        self.terrain_id.iter().filter(|&&id| id == terrain_id).count()
    }

    /// Reset every cell to open base terrain
    pub(crate) fn reset_to_base(&mut self, cost: u8, color: TileColor) {
        self.blocked.fill(false);
        self.terrain_cost.fill(cost);
        self.terrain_id.fill(BASE_TERRAIN_ID);
        self.base_color.fill(color);
    }

    /// Reset cost, id and color of unblocked cells, leaving obstacles untouched
    pub(crate) fn reset_walkable_to_base(&mut self, cost: u8, color: TileColor) {
        for cell in 0..self.cell_count() {
            if !self.blocked[cell] {
                self.terrain_cost[cell] = cost;
                self.terrain_id[cell] = BASE_TERRAIN_ID;
                self.base_color[cell] = color;
            }
        }
    }
}
