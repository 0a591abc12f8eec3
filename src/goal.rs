//! Random reachable goal selection

use rand::Rng;

use crate::connectivity::build_reachable_from;
use crate::generation::GenerationContext;
use crate::grid::TileGrid;

/// Pick a uniformly random goal cell reachable from `start`
///
/// A cell qualifies when it is open, connected to `start`, is not `start`
/// itself and lies at least `min_manhattan` cells away. Selection is a single
/// reservoir-sampling pass over the grid: the k-th qualifying cell replaces the
/// current pick with probability 1/k, so no candidate list is built.
///
/// Returns `None` if fewer than two cells are reachable or nothing qualifies.
///
/// # Example
///
/// ```rust
/// use rust_tile_terrain::*;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let grid = TileGrid::new(9, 9).unwrap();
/// let mut ctx = GenerationContext::new();
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let start = grid.index().center_index();
///
/// let goal = pick_random_reachable_goal(&grid, &mut ctx, start, 4, &mut rng).unwrap();
/// assert!(grid.index().manhattan(start, goal) >= 4);
/// ```
pub fn pick_random_reachable_goal<R: Rng + ?Sized>(
    grid: &TileGrid,
    ctx: &mut GenerationContext,
    start: usize,
    min_manhattan: u32,
    rng: &mut R,
) -> Option<usize> {
    if build_reachable_from(grid, start, ctx) < 2 {
        return None;
    }

    let index = grid.index();
    let mut seen: u32 = 0;
    let mut pick = None;
    for cell in 0..index.cell_count() {
        if cell == start || grid.blocked[cell] || !ctx.is_marked(cell) {
            continue;
        }
        if index.manhattan(start, cell) < min_manhattan {
            continue;
        }
        seen += 1;
        if rng.gen_range(0..seen) == 0 {
            pick = Some(cell);
        }
    }
    pick
}
