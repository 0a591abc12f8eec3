//! Shared scratch state for growth and flood-fill passes
//!
//! Every pass that needs a "visited" set starts a new epoch with
//! [`GenerationContext::next_stamp`]. A cell belongs to the current pass iff its
//! stamp equals the current epoch, so nothing has to be cleared between passes.

/// Reusable BFS queue and epoch-stamped visit marks
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    pub(crate) queue: Vec<usize>,
    stamp: Vec<u32>,
    stamp_id: u32,
}

impl GenerationContext {
    /// Create an empty context; buffers are sized on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context sized for `cell_count` cells
    pub fn with_cell_count(cell_count: usize) -> Self {
        let mut ctx = Self::default();
        ctx.ensure_size(cell_count);
        ctx
    }

    /// Number of cells the buffers are sized for
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.stamp.len()
    }

    /// Resize the buffers for a grid of `cell_count` cells
    ///
    /// Only reallocates when the count changes. Reallocation also restarts the
    /// epoch counter, so marks from the old size never leak.
    pub fn ensure_size(&mut self, cell_count: usize) {
        if self.stamp.len() != cell_count {
            self.queue = vec![0; cell_count];
            self.stamp = vec![0; cell_count];
            self.stamp_id = 0;
        }
    }

    /// Start a new pass and return its epoch id
    ///
    /// On overflow the whole stamp array is cleared and the epoch restarts at 1.
    pub fn next_stamp(&mut self) -> u32 {
        if self.stamp_id == u32::MAX {
            self.stamp.fill(0);
            self.stamp_id = 0;
        }
        self.stamp_id += 1;
        self.stamp_id
    }

    /// Current epoch id (0 before the first pass)
    #[inline]
    pub fn current_stamp(&self) -> u32 {
        self.stamp_id
    }

    /// Mark a cell as visited in the current pass
    #[inline]
    pub fn mark(&mut self, index: usize) {
        self.stamp[index] = self.stamp_id;
    }

    /// Check whether a cell was visited in the current pass
    #[inline]
    pub fn is_marked(&self, index: usize) -> bool {
        self.stamp_id != 0 && self.stamp.get(index) == Some(&self.stamp_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_marks_nothing() {
        let ctx = GenerationContext::with_cell_count(16);
        assert_eq!(ctx.cell_count(), 16);
        assert_eq!(ctx.current_stamp(), 0);
        assert!((0..16).all(|cell| !ctx.is_marked(cell)));
    }

    #[test]
    fn test_new_stamp_forgets_previous_pass() {
        let mut ctx = GenerationContext::with_cell_count(8);
        ctx.next_stamp();
        ctx.mark(3);
        assert!(ctx.is_marked(3));

        ctx.next_stamp();
        assert!(!ctx.is_marked(3));
        ctx.mark(5);
        assert!(ctx.is_marked(5));
        assert!(!ctx.is_marked(100), "out of range cells are never marked");
    }

    #[test]
    fn test_stamp_overflow_clears_and_restarts() {
        let mut ctx = GenerationContext::with_cell_count(4);
        ctx.stamp_id = u32::MAX - 1;
        assert_eq!(ctx.next_stamp(), u32::MAX);
        ctx.mark(0);
        ctx.mark(2);
        assert!(ctx.is_marked(0));

        assert_eq!(ctx.next_stamp(), 1);
        assert!(ctx.stamp.iter().all(|&s| s == 0));
        assert!(!ctx.is_marked(0));
        assert!(!ctx.is_marked(2));

        ctx.mark(1);
        assert!(ctx.is_marked(1));
        assert!(!ctx.is_marked(0));
    }

    #[test]
    fn test_ensure_size_reallocates_on_change_only() {
        let mut ctx = GenerationContext::with_cell_count(4);
        ctx.next_stamp();
        ctx.mark(1);

        ctx.ensure_size(4);
        assert!(ctx.is_marked(1), "same size keeps the current pass");

        ctx.ensure_size(9);
        assert_eq!(ctx.cell_count(), 9);
        assert_eq!(ctx.queue.len(), 9);
        assert!(!ctx.is_marked(1));
    }
}
