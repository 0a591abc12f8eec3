//! Uniform scatter

use rand::Rng;

use super::CellGate;

/// Claim each eligible cell independently with probability `chance`
///
/// Cells are visited in index order, so the output is sorted and free of
/// duplicates without needing a visit set.
pub fn scatter_cells<R: Rng + ?Sized>(
    gate: &CellGate<'_>,
    chance: f32,
    rng: &mut R,
    out: &mut Vec<usize>,
) {
    let cell_count = gate.grid_index().cell_count();
    for cell in 0..cell_count {
        if gate.can_use(cell) && rng.gen::<f32>() < chance {
            out.push(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGrid;
    use crate::rule::TerrainRule;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_scatter_extremes() {
        let grid = TileGrid::new(8, 8).unwrap();
        let rule = TerrainRule::obstacle("Rock");
        let gate = CellGate::new(&grid, &rule);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let mut out = Vec::new();
        scatter_cells(&gate, 0.0, &mut rng, &mut out);
        assert!(out.is_empty());

        scatter_cells(&gate, 1.0, &mut rng, &mut out);
        assert_eq!(out.len(), 64);
    }

    #[test]
    fn test_scatter_density_and_gate() {
        let mut grid = TileGrid::new(100, 100).unwrap();
        for cell in 0..5_000 {
            grid.blocked[cell] = true;
        }
        let rule = TerrainRule::terrain("Grass", 1);
        let gate = CellGate::new(&grid, &rule);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut out = Vec::new();

        scatter_cells(&gate, 0.3, &mut rng, &mut out);
        assert!(out.iter().all(|&cell| cell >= 5_000), "blocked cells are never claimed");
        // 5000 trials at p = 0.3: mean 1500, sd ~32
        assert!((1_300..=1_700).contains(&out.len()), "got {}", out.len());
        assert!(out.windows(2).all(|w| w[0] < w[1]));
    }
}
