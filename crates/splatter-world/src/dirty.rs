use std::collections::{HashMap, HashSet};

use splatter_core::types::{ChunkCoord, GridId};

/// Chunks changed since the last sync tick, grouped by grid.
///
/// Written by the store during a tick and handed whole to the sync engine,
/// which consumes it. A fresh set starts every tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirtySet {
    grids: HashMap<GridId, HashSet<ChunkCoord>>,
}

impl DirtySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, grid: GridId, coord: ChunkCoord) {
        self.grids.entry(grid).or_default().insert(coord);
    }

    /// Dirty chunks of one grid, if any.
    pub fn chunks(&self, grid: GridId) -> Option<&HashSet<ChunkCoord>> {
        self.grids.get(&grid)
    }

    pub fn contains(&self, grid: GridId, coord: ChunkCoord) -> bool {
        self.grids
            .get(&grid)
            .is_some_and(|chunks| chunks.contains(&coord))
    }

    /// Forget everything recorded for `grid`.
    pub fn forget_grid(&mut self, grid: GridId) {
        self.grids.remove(&grid);
    }

    /// Total number of dirty (grid, chunk) pairs.
    pub fn len(&self) -> usize {
        self.grids.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.values().all(|c| c.is_empty())
    }

    pub fn clear(&mut self) {
        self.grids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_mark_is_idempotent() {
        let mut dirty = DirtySet::new();
        dirty.mark(GridId(1), IVec2::new(0, 0));
        dirty.mark(GridId(1), IVec2::new(0, 0));
        dirty.mark(GridId(2), IVec2::new(0, 0));
        assert_eq!(dirty.len(), 2);
        assert!(dirty.contains(GridId(1), IVec2::new(0, 0)));
        assert!(!dirty.contains(GridId(1), IVec2::new(1, 0)));
    }

    #[test]
    fn test_clear_and_forget() {
        let mut dirty = DirtySet::new();
        dirty.mark(GridId(1), IVec2::new(0, 0));
        dirty.mark(GridId(2), IVec2::new(3, 3));
        dirty.forget_grid(GridId(1));
        assert!(dirty.chunks(GridId(1)).is_none());
        assert_eq!(dirty.len(), 1);
        dirty.clear();
        assert!(dirty.is_empty());
    }
}
