//! Flood-fill connectivity over open cells
//!
//! Movement is 8-directional, but a diagonal step is only allowed when both
//! orthogonal corner cells are open: a walker may not squeeze between two
//! diagonally touching obstacles. Under that rule reachability is symmetric.

use crate::generation::GenerationContext;
use crate::grid::{TileGrid, NEIGHBOR_OFFSETS};

/// Capability for counting cells reachable from a start cell
///
/// [`GenerationContext`] implements this with [`build_reachable_from`]; hosts
/// that keep connectivity elsewhere can inject their own implementation into
/// [`TerrainGenerator::generate_with_oracle`](crate::TerrainGenerator::generate_with_oracle).
pub trait ReachabilityOracle {
    /// Number of open cells connected to `start` (including it), 0 if `start`
    /// is invalid or blocked
    fn reachable_count_from(&mut self, grid: &TileGrid, start: usize) -> usize;
}

impl ReachabilityOracle for GenerationContext {
    fn reachable_count_from(&mut self, grid: &TileGrid, start: usize) -> usize {
        build_reachable_from(grid, start, self)
    }
}

/// Flood-fill from `start` and return the size of its open region
///
/// Afterwards `ctx.is_marked(cell)` tells whether `cell` belongs to the region,
/// until the context starts another pass. An invalid or blocked start yields 0
/// and an empty region.
///
/// # Example
///
/// ```rust
/// use rust_tile_terrain::*;
///
/// let mut grid = TileGrid::new(3, 3).unwrap();
/// grid.blocked[1] = true;
/// grid.blocked[3] = true;
///
/// let mut ctx = GenerationContext::with_cell_count(grid.cell_count());
/// // cell 0 is sealed off by the diagonal wall at 1 and 3
/// assert_eq!(build_reachable_from(&grid, 0, &mut ctx), 1);
/// assert_eq!(build_reachable_from(&grid, 8, &mut ctx), 6);
/// assert!(!ctx.is_marked(0));
/// ```
pub fn build_reachable_from(grid: &TileGrid, start: usize, ctx: &mut GenerationContext) -> usize {
    let index = grid.index();
    ctx.ensure_size(index.cell_count());
    ctx.next_stamp();

    if !index.is_valid_cell(start) || grid.blocked[start] {
        return 0;
    }

    let width = index.width();
    ctx.mark(start);
    ctx.queue[0] = start;
    let (mut head, mut tail) = (0, 1);

    while head < tail {
        let cell = ctx.queue[head];
        head += 1;
        let (x, y) = index.index_to_xy(cell);

        for (dx, dy) in NEIGHBOR_OFFSETS {
            let (nx, ny) = (x + dx, y + dy);
            if !index.in_bounds(nx, ny) {
                continue;
            }
            let next = (nx + ny * width) as usize;
            if grid.blocked[next] || ctx.is_marked(next) {
                continue;
            }
            if dx != 0 && dy != 0 {
                let side_x = (nx + y * width) as usize;
                let side_y = (x + ny * width) as usize;
                if grid.blocked[side_x] || grid.blocked[side_y] {
                    continue;
                }
            }

            ctx.mark(next);
            ctx.queue[tail] = next;
            tail += 1;
        }
    }

    tail
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from_ascii(rows: &[&str]) -> TileGrid {
        let mut grid = TileGrid::new(rows[0].len() as i32, rows.len() as i32).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                grid.blocked[x + y * rows[0].len()] = ch == '#';
            }
        }
        grid
    }

    #[test]
    fn test_open_grid_reaches_everything() {
        let grid = TileGrid::new(12, 9).unwrap();
        let mut ctx = GenerationContext::new();
        assert_eq!(build_reachable_from(&grid, 0, &mut ctx), 108);
        assert!((0..108).all(|cell| ctx.is_marked(cell)));
    }

    #[test]
    fn test_blocked_or_invalid_start() {
        let grid = grid_from_ascii(&["#..", "...", "..."]);
        let mut ctx = GenerationContext::new();
        assert_eq!(build_reachable_from(&grid, 4, &mut ctx), 8);

        assert_eq!(build_reachable_from(&grid, 0, &mut ctx), 0);
        assert!((0..9).all(|cell| !ctx.is_marked(cell)), "previous region must not leak");

        assert_eq!(build_reachable_from(&grid, 9, &mut ctx), 0);
    }

    #[test]
    fn test_diagonal_corner_cutting_is_blocked() {
        // the two open cells touch only diagonally, through a wall pair
        let grid = grid_from_ascii(&[".#", "#."]);
        let mut ctx = GenerationContext::new();
        assert_eq!(build_reachable_from(&grid, 0, &mut ctx), 1);
        assert_eq!(build_reachable_from(&grid, 3, &mut ctx), 1);
    }

    #[test]
    fn test_diagonal_needs_both_corners() {
        // one corner open: the cells connect orthogonally, never diagonally
        let grid = grid_from_ascii(&[".#.", "..#", "#.."]);
        let mut ctx = GenerationContext::new();
        assert_eq!(build_reachable_from(&grid, 0, &mut ctx), 5);
        assert!(!ctx.is_marked(2), "(2,0) is only diagonally adjacent to open cells");
    }

    #[test]
    fn test_separate_regions_and_symmetry() {
        let grid = grid_from_ascii(&[
            "...#....",
            "...#....",
            "####....",
            "........",
        ]);
        let mut ctx = GenerationContext::new();
        let index = grid.index();
        let a = index.to_index(0, 0).unwrap();
        let b = index.to_index(7, 3).unwrap();
        let c = index.to_index(0, 3).unwrap();

        assert_eq!(build_reachable_from(&grid, a, &mut ctx), 6);
        assert!(!ctx.is_marked(b));
        assert_eq!(build_reachable_from(&grid, b, &mut ctx), 20);
        assert!(ctx.is_marked(c));
        assert!(!ctx.is_marked(a));
        assert_eq!(build_reachable_from(&grid, c, &mut ctx), 20);
        assert!(ctx.is_marked(b));
    }

    #[test]
    fn test_oracle_matches_flood_fill() {
        let grid = grid_from_ascii(&["..#..", "..#..", "....."]);
        let mut ctx = GenerationContext::new();
        let direct = build_reachable_from(&grid, 0, &mut ctx);
        let oracle: &mut dyn ReachabilityOracle = &mut ctx;
        assert_eq!(oracle.reachable_count_from(&grid, 0), direct);
        assert_eq!(direct, 13);
    }
}
