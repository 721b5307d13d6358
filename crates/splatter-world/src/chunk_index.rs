use std::collections::HashMap;

use crate::chunk::{DecalChunk, GridChunkCollection};
use splatter_core::constants::TILE_CENTER_OFFSET;
use splatter_core::math::chunk_coord_of;
use splatter_core::types::{ChunkCoord, DecalId, GridId};
use splatter_core::Decal;
use glam::Vec2;

/// Spatial container for all decals, one collection per grid.
#[derive(Debug, Default, Clone)]
pub struct ChunkIndex {
    grids: HashMap<GridId, GridChunkCollection>,
}

impl ChunkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection for `grid`, created on first use.
    pub fn collection(&mut self, grid: GridId) -> &mut GridChunkCollection {
        self.grids.entry(grid).or_default()
    }

    /// Collection for `grid` without creating one.
    pub fn get_collection(&self, grid: GridId) -> Option<&GridChunkCollection> {
        self.grids.get(&grid)
    }

    pub(crate) fn get_collection_mut(&mut self, grid: GridId) -> Option<&mut GridChunkCollection> {
        self.grids.get_mut(&grid)
    }

    /// Drop every decal of a grid that no longer exists.
    pub fn remove_grid(&mut self, grid: GridId) -> Option<GridChunkCollection> {
        self.grids.remove(&grid)
    }

    pub fn chunk_at(&self, grid: GridId, coord: ChunkCoord) -> Option<&DecalChunk> {
        self.grids.get(&grid)?.chunk(&coord)
    }

    pub fn locate(&self, grid: GridId, uid: DecalId) -> Option<ChunkCoord> {
        self.grids.get(&grid)?.locate(uid)
    }

    pub fn decal(&self, grid: GridId, uid: DecalId) -> Option<&Decal> {
        self.grids.get(&grid)?.get(uid)
    }

    /// Next id `grid` will hand out (0 for a grid with no collection yet).
    pub fn next_uid(&self, grid: GridId) -> DecalId {
        self.grids.get(&grid).map_or(0, |c| c.next_uid())
    }

    pub fn decal_count(&self, grid: GridId) -> usize {
        self.grids.get(&grid).map_or(0, |c| c.decal_count())
    }

    pub fn chunk_count(&self, grid: GridId) -> usize {
        self.grids.get(&grid).map_or(0, |c| c.chunk_count())
    }

    pub fn grids(&self) -> impl Iterator<Item = GridId> + '_ {
        self.grids.keys().copied()
    }

    /// Decals within `radius` of `position`, measured to each decal's tile centre.
    ///
    /// Only the chunk containing `position` is searched, so decals just across
    /// a chunk border are not returned even when they are within range.
    pub fn decals_near(&self, grid: GridId, position: Vec2, radius: f32) -> Vec<(DecalId, Decal)> {
        self.decals_near_matching(grid, position, radius, |_| true)
    }

    /// `decals_near` restricted to decals accepted by `predicate`.
    pub fn decals_near_matching<F>(
        &self,
        grid: GridId,
        position: Vec2,
        radius: f32,
        predicate: F,
    ) -> Vec<(DecalId, Decal)>
    where
        F: Fn(&Decal) -> bool,
    {
        let Some(chunk) = self.chunk_at(grid, chunk_coord_of(position)) else {
            return Vec::new();
        };
        let center_offset = Vec2::splat(TILE_CENTER_OFFSET);
        chunk
            .iter()
            .filter(|(_, decal)| (position - decal.position - center_offset).length() <= radius)
            .filter(|(_, decal)| predicate(*decal))
            .map(|(uid, decal)| (*uid, decal.clone()))
            .collect()
    }

    /// Every collection satisfies its reverse-index invariant.
    pub fn is_consistent(&self) -> bool {
        self.grids.values().all(|c| c.is_consistent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn index_with(grid: GridId, decals: &[Decal]) -> ChunkIndex {
        let mut index = ChunkIndex::new();
        let collection = index.collection(grid);
        for decal in decals {
            let uid = collection.allocate_uid().expect("uid");
            collection.insert(chunk_coord_of(decal.position), uid, decal.clone());
        }
        index
    }

    #[test]
    fn test_collection_created_lazily() {
        let mut index = ChunkIndex::new();
        assert!(index.get_collection(GridId(1)).is_none());
        index.collection(GridId(1));
        assert!(index.get_collection(GridId(1)).is_some());
        assert_eq!(index.next_uid(GridId(2)), 0);
    }

    #[test]
    fn test_decals_near_measures_to_tile_center() {
        let grid = GridId(1);
        let index = index_with(
            grid,
            &[
                Decal::new(Vec2::new(0.0, 0.0), "blood"),
                Decal::new(Vec2::new(3.0, 0.0), "blood"),
            ],
        );

        let hits = index.decals_near(grid, Vec2::new(0.5, 0.5), 0.75);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 0);

        let hits = index.decals_near(grid, Vec2::new(3.5, 0.5), 0.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 1);
    }

    #[test]
    fn test_decals_near_is_chunk_local() {
        let grid = GridId(1);
        // Decal centre at (31.5, 0.5), query just across the border in chunk (1, 0).
        let index = index_with(grid, &[Decal::new(Vec2::new(31.0, 0.0), "blood")]);
        assert_eq!(chunk_coord_of(Vec2::new(32.1, 0.5)), IVec2::new(1, 0));
        assert!(index.decals_near(grid, Vec2::new(32.1, 0.5), 2.0).is_empty());
        assert_eq!(index.decals_near(grid, Vec2::new(31.9, 0.5), 2.0).len(), 1);
    }

    #[test]
    fn test_decals_near_matching_filters() {
        let grid = GridId(1);
        let index = index_with(
            grid,
            &[
                Decal::new(Vec2::new(1.0, 1.0), "blood").with_cleanable(true),
                Decal::new(Vec2::new(1.0, 1.0), "scorch"),
            ],
        );
        let cleanable =
            index.decals_near_matching(grid, Vec2::new(1.5, 1.5), 0.75, |d| d.cleanable);
        assert_eq!(cleanable.len(), 1);
        assert_eq!(cleanable[0].1.kind, "blood");
    }

    #[test]
    fn test_remove_grid_forgets_everything() {
        let grid = GridId(4);
        let mut index = index_with(grid, &[Decal::new(Vec2::new(1.0, 1.0), "blood")]);
        assert_eq!(index.decal_count(grid), 1);
        assert!(index.remove_grid(grid).is_some());
        assert_eq!(index.decal_count(grid), 0);
        assert!(index.decal(grid, 0).is_none());
    }
}
