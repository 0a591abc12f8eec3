//! Region growth algorithms
//!
//! Each algorithm turns a [`TerrainRule`] into a set of cell indices. The
//! algorithms never write to the grid: they only read it through a
//! [`CellGate`], and the pipeline applies the rule to whatever they return.

mod blob;
mod context;
mod lichtenberg;
mod scatter;

pub use blob::{grow_blobs, MIN_BLOB_SIZE};
pub use context::GenerationContext;
pub use lichtenberg::grow_lichtenberg;
pub use scatter::scatter_cells;

use rand::Rng;

use crate::grid::{GridIndex, TileGrid, BASE_TERRAIN_ID};
use crate::rule::{GrowthMode, TerrainRule};

/// Per-cell eligibility check for one rule against the current grid state
#[derive(Debug, Clone, Copy)]
pub struct CellGate<'a> {
    grid: &'a TileGrid,
    rule: &'a TerrainRule,
}

impl<'a> CellGate<'a> {
    /// Bind a rule to the grid it will be applied to
    pub fn new(grid: &'a TileGrid, rule: &'a TerrainRule) -> Self {
        Self { grid, rule }
    }

    /// Coordinate mapping of the underlying grid
    #[inline]
    pub fn grid_index(&self) -> GridIndex {
        self.grid.index()
    }

    /// May the rule write to this cell?
    pub fn can_use(&self, index: usize) -> bool {
        if self.grid.blocked[index] && !self.rule.allow_overwrite_obstacle {
            return false;
        }
        let is_base = self.grid.terrain_id[index] == BASE_TERRAIN_ID;
        if self.rule.only_affect_base || !self.rule.allow_overwrite_terrain {
            return is_base;
        }
        true
    }

    /// May growth start (or anchor a path) at this cell?
    pub fn can_pick(&self, index: usize) -> bool {
        if self.rule.force_unblocked_seed && self.grid.blocked[index] {
            return false;
        }
        self.can_use(index)
    }
}

/// Run the rule's growth algorithm, appending claimed cells to `out`
///
/// `out` receives each cell at most once. The context is resized to the gate's
/// grid if needed.
pub fn grow_region<R: Rng + ?Sized>(
    rule: &TerrainRule,
    gate: &CellGate<'_>,
    ctx: &mut GenerationContext,
    rng: &mut R,
    out: &mut Vec<usize>,
) {
    match &rule.mode {
        GrowthMode::Static(params) => scatter_cells(gate, params.chance, rng, out),
        GrowthMode::Blob(params) => {
            grow_blobs(gate, params, rule.coverage_percent, ctx, rng, out)
        }
        GrowthMode::Lichtenberg(params) => grow_lichtenberg(gate, params, ctx, rng, out),
    }
}

/// Add every unvisited, eligible orthogonal neighbour of the cells in `out`
///
/// One call is one pass; cells added during the pass are not expanded again.
pub(crate) fn expand_orthogonal(
    gate: &CellGate<'_>,
    ctx: &mut GenerationContext,
    out: &mut Vec<usize>,
) {
    let grid = gate.grid_index();
    let len = out.len();
    for i in 0..len {
        let cell = out[i];
        for (dx, dy) in crate::grid::ORTHOGONAL_OFFSETS {
            let Some(next) = grid.offset(cell, dx, dy) else {
                continue;
            };
            if !ctx.is_marked(next) && gate.can_use(next) {
                ctx.mark(next);
                out.push(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::StaticParams;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid_with_owner() -> TileGrid {
        // cell 0: base, cell 1: blocked, cell 2: owned by terrain id 4
        let mut grid = TileGrid::new(3, 1).unwrap();
        grid.blocked[1] = true;
        grid.terrain_id[2] = 4;
        grid
    }

    #[test]
    fn test_default_policy_is_base_only() {
        let grid = grid_with_owner();
        let rule = TerrainRule::terrain("Sand", 2);
        let gate = CellGate::new(&grid, &rule);
        assert!(gate.can_use(0));
        assert!(!gate.can_use(1));
        assert!(!gate.can_use(2));
    }

    #[test]
    fn test_allow_overwrite_terrain_needs_only_base_off() {
        let grid = grid_with_owner();

        let still_base = TerrainRule::terrain("Sand", 2).allow_overwrite_terrain(true);
        assert!(!CellGate::new(&grid, &still_base).can_use(2));

        let relaxed = TerrainRule::terrain("Sand", 2)
            .only_affect_base(false)
            .allow_overwrite_terrain(true);
        assert!(CellGate::new(&grid, &relaxed).can_use(2));

        let only_base_off = TerrainRule::terrain("Sand", 2).only_affect_base(false);
        assert!(!CellGate::new(&grid, &only_base_off).can_use(2));
    }

    #[test]
    fn test_obstacle_overwrite_and_seed_picking() {
        let grid = grid_with_owner();
        let rule = TerrainRule::terrain("Bridge", 1).allow_overwrite_obstacle(true);
        let gate = CellGate::new(&grid, &rule);
        assert!(gate.can_use(1));
        assert!(!gate.can_pick(1), "seeds must be open by default");

        let loose = rule.clone().force_unblocked_seed(false);
        assert!(CellGate::new(&grid, &loose).can_pick(1));
    }

    #[test]
    fn test_grow_region_dispatches_static() {
        let grid = TileGrid::new(4, 4).unwrap();
        let rule = TerrainRule::obstacle("All")
            .with_mode(GrowthMode::Static(StaticParams { chance: 1.0 }));
        let gate = CellGate::new(&grid, &rule);
        let mut ctx = GenerationContext::with_cell_count(16);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = Vec::new();

        grow_region(&rule, &gate, &mut ctx, &mut rng, &mut out);
        assert_eq!(out, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_grow_region_sizes_fresh_context() {
        use crate::rule::{BlobParams, LichtenbergParams};

        let grid = TileGrid::new(10, 10).unwrap();
        let modes = [
            GrowthMode::Blob(BlobParams::default()),
            GrowthMode::Lichtenberg(LichtenbergParams::default()),
        ];
        for mode in modes {
            let rule = TerrainRule::obstacle("Rock").with_mode(mode);
            let gate = CellGate::new(&grid, &rule);
            let mut ctx = GenerationContext::new();
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            let mut out = Vec::new();

            grow_region(&rule, &gate, &mut ctx, &mut rng, &mut out);
            assert_eq!(ctx.cell_count(), 100);
            assert!(!out.is_empty(), "{} claimed nothing", rule.mode.name());
        }
    }

    #[test]
    fn test_expand_orthogonal_respects_gate() {
        let mut grid = TileGrid::new(3, 3).unwrap();
        grid.blocked[1] = true;
        let rule = TerrainRule::terrain("Moss", 1);
        let gate = CellGate::new(&grid, &rule);
        let mut ctx = GenerationContext::with_cell_count(9);
        ctx.next_stamp();
        ctx.mark(4);
        let mut out = vec![4];

        expand_orthogonal(&gate, &mut ctx, &mut out);
        let mut added = out[1..].to_vec();
        added.sort_unstable();
        assert_eq!(added, vec![3, 5, 7]);
    }
}
