//! Blob growth
//!
//! Blobs start at randomly probed seed cells and grow breadth-first; every
//! frontier neighbour joins with probability `grow_chance` until the blob hits
//! its target size or runs out of frontier.

use rand::Rng;

use super::{expand_orthogonal, CellGate, GenerationContext};
use crate::grid::ORTHOGONAL_OFFSETS;
use crate::rule::BlobParams;

/// Smallest target size a blob can roll
pub const MIN_BLOB_SIZE: usize = 10;

/// Grow the blobs for one rule, appending claimed cells to `out`
///
/// All blobs of one call share a visit set, so they never claim a cell twice;
/// blobs that touch simply merge. Smoothing passes run after every blob has
/// grown and are not bound by the per-blob size cap.
pub fn grow_blobs<R: Rng + ?Sized>(
    gate: &CellGate<'_>,
    params: &BlobParams,
    coverage_percent: f32,
    ctx: &mut GenerationContext,
    rng: &mut R,
    out: &mut Vec<usize>,
) {
    let cell_count = gate.grid_index().cell_count();
    ctx.ensure_size(cell_count);
    let avg_size = params.avg_size.max(1);
    let desired_cells = (coverage_percent * cell_count as f32).round() as u32;
    let blob_count = (desired_cells / avg_size)
        .max(params.min_blobs)
        .min(params.max_blobs);

    ctx.next_stamp();
    for _ in 0..blob_count {
        let Some(seed) = pick_seed(gate, params.seed_attempts, ctx, rng) else {
            continue;
        };
        let target = roll_target_size(avg_size, params.size_jitter, rng);
        grow_one(gate, seed, target, params.grow_chance, ctx, rng, out);
    }

    for _ in 0..params.smoothing_passes {
        expand_orthogonal(gate, ctx, out);
    }

    tracing::trace!(blob_count, desired_cells, claimed = out.len(), "grew blobs");
}

fn roll_target_size<R: Rng + ?Sized>(avg_size: u32, jitter: u32, rng: &mut R) -> usize {
    let jitter = i64::from(jitter);
    let offset = if jitter > 0 { rng.gen_range(-jitter..=jitter) } else { 0 };
    (i64::from(avg_size) + offset).max(MIN_BLOB_SIZE as i64) as usize
}

/// Rejection-sample an unclaimed cell the rule may seed on
fn pick_seed<R: Rng + ?Sized>(
    gate: &CellGate<'_>,
    attempts: u32,
    ctx: &GenerationContext,
    rng: &mut R,
) -> Option<usize> {
    let cell_count = gate.grid_index().cell_count();
    (0..attempts)
        .map(|_| rng.gen_range(0..cell_count))
        .find(|&cell| !ctx.is_marked(cell) && gate.can_pick(cell))
}

fn grow_one<R: Rng + ?Sized>(
    gate: &CellGate<'_>,
    seed: usize,
    target: usize,
    grow_chance: f32,
    ctx: &mut GenerationContext,
    rng: &mut R,
    out: &mut Vec<usize>,
) {
    let grid = gate.grid_index();

    ctx.mark(seed);
    out.push(seed);
    ctx.queue[0] = seed;
    let (mut head, mut tail) = (0, 1);
    let mut size = 1;

    'grow: while head < tail && size < target {
        let cell = ctx.queue[head];
        head += 1;

        for (dx, dy) in ORTHOGONAL_OFFSETS {
            let Some(next) = grid.offset(cell, dx, dy) else {
                continue;
            };
            if ctx.is_marked(next) || !gate.can_use(next) {
                continue;
            }
            if rng.gen::<f32>() >= grow_chance {
                continue;
            }

            ctx.mark(next);
            out.push(next);
            ctx.queue[tail] = next;
            tail += 1;
            size += 1;
            if size >= target {
                break 'grow;
            }
        }
    }
}
