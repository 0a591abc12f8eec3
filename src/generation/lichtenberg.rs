//! Branching fractal paths
//!
//! Random walkers travel from one edge cell toward another, splitting into
//! branches as they go. Walkers never revisit a cell claimed earlier in the
//! same call, which keeps the veins thin and the output duplicate-free.
//!
//! # Algorithm
//!
//! 1. Probe for an eligible start cell and a distinct target cell on the border
//! 2. Step the walkers round-robin, one step per iteration, until the step
//!    budget runs out or a walker lands on the target
//! 3. Each step scans the eight neighbours (toward-target moves first) from a
//!    random rotation and takes the first one whose toward/away class matches a
//!    biased coin, falling back to the first eligible neighbour
//! 4. Optionally widen the veins by their orthogonal neighbours

use glam::IVec2;
use rand::Rng;

use super::{expand_orthogonal, CellGate, GenerationContext};
use crate::grid::GridIndex;
use crate::rule::LichtenbergParams;

/// Grow a branching path for one rule, appending claimed cells to `out`
///
/// Without widening the call claims at most `max_steps` cells (the start cell
/// counts as the first step). Nothing is claimed if no eligible start and
/// target can be found.
pub fn grow_lichtenberg<R: Rng + ?Sized>(
    gate: &CellGate<'_>,
    params: &LichtenbergParams,
    ctx: &mut GenerationContext,
    rng: &mut R,
    out: &mut Vec<usize>,
) {
    if params.max_steps == 0 || params.max_walkers == 0 {
        return;
    }
    let grid = gate.grid_index();
    ctx.ensure_size(grid.cell_count());

    ctx.next_stamp();
    let Some(start) = pick_edge_cell(gate, params.endpoint_attempts, None, rng) else {
        return;
    };
    let Some(target) = pick_edge_cell(gate, params.endpoint_attempts, Some(start), rng) else {
        return;
    };
    let target_pos = grid.position(target);
    let max_walkers = params.max_walkers as usize;

    ctx.mark(start);
    out.push(start);

    let mut walkers = Vec::with_capacity(max_walkers);
    walkers.push(start);
    let mut turn = 0;
    let mut reached = false;

    for _ in 1..params.max_steps {
        if walkers.is_empty() {
            break;
        }
        turn %= walkers.len();
        let current = walkers[turn];

        let bias = params.toward_target_bias;
        let Some(next) = step_walker(gate, ctx, current, target_pos, bias, rng) else {
            // boxed in: retire the walker, the next one inherits its turn slot
            walkers.swap_remove(turn);
            continue;
        };

        ctx.mark(next);
        out.push(next);
        walkers[turn] = next;
        if next == target {
            reached = true;
            break;
        }

        if walkers.len() < max_walkers && rng.gen::<f32>() < params.branch_chance {
            walkers.push(next);
        }
        turn += 1;
    }

    for _ in 0..params.widen_passes {
        expand_orthogonal(gate, ctx, out);
    }

    tracing::trace!(start, target, reached, claimed = out.len(), "grew lichtenberg path");
}

/// Rejection-sample an eligible border cell, optionally excluding one cell
fn pick_edge_cell<R: Rng + ?Sized>(
    gate: &CellGate<'_>,
    attempts: u32,
    exclude: Option<usize>,
    rng: &mut R,
) -> Option<usize> {
    let grid = gate.grid_index();
    (0..attempts)
        .map(|_| random_edge_cell(grid, rng))
        .find(|&cell| Some(cell) != exclude && gate.can_pick(cell))
}

fn random_edge_cell<R: Rng + ?Sized>(grid: GridIndex, rng: &mut R) -> usize {
    let (w, h) = (grid.width(), grid.height());
    let (x, y) = match rng.gen_range(0..4) {
        0 => (rng.gen_range(0..w), 0),
        1 => (rng.gen_range(0..w), h - 1),
        2 => (0, rng.gen_range(0..h)),
        _ => (w - 1, rng.gen_range(0..h)),
    };
    (x + y * w) as usize
}

/// Direction sign toward the target; ties pick a random side
fn axis_sign<R: Rng + ?Sized>(delta: i32, rng: &mut R) -> i32 {
    match delta.signum() {
        0 if rng.gen::<bool>() => 1,
        0 => -1,
        sign => sign,
    }
}

/// Ordered candidate moves: toward-target axis steps, reinforcing diagonals,
/// then moves away. The flag marks toward-target candidates.
fn candidate_moves(sx: i32, sy: i32) -> [(IVec2, bool); 8] {
    [
        (IVec2::new(sx, 0), true),
        (IVec2::new(0, sy), true),
        (IVec2::new(sx, sy), true),
        (IVec2::new(sx, -sy), true),
        (IVec2::new(-sx, sy), true),
        (IVec2::new(-sx, 0), false),
        (IVec2::new(0, -sy), false),
        (IVec2::new(-sx, -sy), false),
    ]
}

fn step_walker<R: Rng + ?Sized>(
    gate: &CellGate<'_>,
    ctx: &GenerationContext,
    current: usize,
    target_pos: IVec2,
    bias: f32,
    rng: &mut R,
) -> Option<usize> {
    let grid = gate.grid_index();
    let delta = target_pos - grid.position(current);
    let candidates = candidate_moves(axis_sign(delta.x, rng), axis_sign(delta.y, rng));
    let rotation = rng.gen_range(0..candidates.len());

    let mut fallback = None;
    for k in 0..candidates.len() {
        let (dir, toward) = candidates[(rotation + k) % candidates.len()];
        let Some(next) = grid.offset(current, dir.x, dir.y) else {
            continue;
        };
        if ctx.is_marked(next) || !gate.can_use(next) {
            continue;
        }
        if fallback.is_none() {
            fallback = Some(next);
        }
        let wants_toward = rng.gen::<f32>() < bias;
        if wants_toward == toward {
            return Some(next);
        }
    }
    fallback
}
