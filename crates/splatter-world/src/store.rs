use std::mem;

use crate::chunk_index::ChunkIndex;
use crate::dirty::DirtySet;
use glam::Vec2;
use splatter_core::math::chunk_coord_of;
use splatter_core::services::{DecalCatalog, GridService};
use splatter_core::types::{ChunkCoord, DecalId, GridCoordinates, GridId};
use splatter_core::{Color, Decal, DecalError};

/// Owner of every decal on the server and the only writer of the chunk index
/// and dirty set. Runs on the simulation thread; nothing here locks.
pub struct DecalStore {
    index: ChunkIndex,
    dirty: DirtySet,
    catalog: Box<dyn DecalCatalog>,
}

impl DecalStore {
    pub fn new(catalog: Box<dyn DecalCatalog>) -> Self {
        Self {
            index: ChunkIndex::new(),
            dirty: DirtySet::new(),
            catalog,
        }
    }

    /// Get the chunk index for reading.
    pub fn index(&self) -> &ChunkIndex {
        &self.index
    }

    /// Chunks dirtied since the last `take_dirty`.
    pub fn dirty(&self) -> &DirtySet {
        &self.dirty
    }

    /// Hand this tick's dirty set to the caller and start a new one.
    pub fn take_dirty(&mut self) -> DirtySet {
        mem::take(&mut self.dirty)
    }

    /// Place `decal` at `coordinates`. The decal's own position is replaced by
    /// the target position.
    pub fn add_decal(
        &mut self,
        grids: &dyn GridService,
        decal: Decal,
        coordinates: GridCoordinates,
    ) -> Result<DecalId, DecalError> {
        if !self.catalog.is_known_kind(&decal.kind) {
            return Err(DecalError::UnknownKind(decal.kind));
        }

        let grid = coordinates.grid;
        if !grids.grid_exists(grid) {
            return Err(DecalError::GridNotFound(grid));
        }
        let tile = grids
            .tile_at(grid, coordinates.position)
            .ok_or(DecalError::GridNotFound(grid))?;
        if grids.tile_is_unsupported(&tile) {
            return Err(DecalError::UnsupportedTile {
                grid,
                tile: tile.indices,
            });
        }

        let uid = self.allocate_uid(grid)?;
        self.place_decal(grid, uid, decal.with_position(coordinates.position));
        log::debug!("Added decal {} on grid {:?} at {}", uid, grid, coordinates.position);
        Ok(uid)
    }

    /// Insert with a fresh id from `grid`'s counter and dirty the chunk.
    fn allocate_uid(&mut self, grid: GridId) -> Result<DecalId, DecalError> {
        self.index
            .collection(grid)
            .allocate_uid()
            .ok_or(DecalError::IdsExhausted(grid))
    }

    fn place_decal(&mut self, grid: GridId, uid: DecalId, decal: Decal) {
        let coord = chunk_coord_of(decal.position);
        self.index.collection(grid).insert(coord, uid, decal);
        self.dirty.mark(grid, coord);
    }

    /// Remove a decal. Returns false if `uid` is unknown on `grid`.
    pub fn remove_decal(&mut self, grid: GridId, uid: DecalId) -> bool {
        match self.take_decal(grid, uid) {
            Some((coord, _)) => {
                self.dirty.mark(grid, coord);
                true
            }
            None => false,
        }
    }

    /// Remove a decal without dirtying its chunk. Callers batching several
    /// removals in one chunk mark it themselves.
    pub(crate) fn take_decal(&mut self, grid: GridId, uid: DecalId) -> Option<(ChunkCoord, Decal)> {
        self.index.get_collection_mut(grid)?.remove(uid)
    }

    /// Move a decal. Within one grid the id is kept; moving to another grid
    /// re-inserts it with an id from the destination grid's counter. Returns
    /// the id the decal has afterwards, or `None` if `uid` is unknown or the
    /// destination grid has no ids left. In both cases nothing changes.
    pub fn set_position(
        &mut self,
        grid: GridId,
        uid: DecalId,
        new_grid: GridId,
        position: Vec2,
    ) -> Option<DecalId> {
        let collection = self.index.get_collection_mut(grid)?;
        let old_coord = collection.locate(uid)?;

        if new_grid == grid {
            let new_coord = chunk_coord_of(position);
            if new_coord == old_coord {
                let moved = collection.get(uid)?.with_position(position);
                collection.replace(uid, moved);
            } else {
                let (_, decal) = collection.remove(uid)?;
                collection.insert(new_coord, uid, decal.with_position(position));
                self.dirty.mark(grid, new_coord);
            }
            self.dirty.mark(grid, old_coord);
            return Some(uid);
        }

        let new_uid = match self.allocate_uid(new_grid) {
            Ok(new_uid) => new_uid,
            Err(e) => {
                log::warn!("Cannot move decal {} off grid {:?}: {e}", uid, grid);
                return None;
            }
        };
        let (_, decal) = self.take_decal(grid, uid)?;
        self.dirty.mark(grid, old_coord);
        self.place_decal(new_grid, new_uid, decal.with_position(position));
        log::debug!(
            "Moved decal {} from grid {:?} to grid {:?} as {}",
            uid,
            grid,
            new_grid,
            new_uid
        );
        Some(new_uid)
    }

    pub fn set_color(&mut self, grid: GridId, uid: DecalId, color: Option<Color>) -> bool {
        self.restyle(grid, uid, |d| d.with_color(color))
    }

    /// Change a decal's kind. An unknown id and an unknown kind are reported
    /// as different errors.
    pub fn set_kind(&mut self, grid: GridId, uid: DecalId, kind: &str) -> Result<(), DecalError> {
        if self.index.locate(grid, uid).is_none() {
            return Err(DecalError::UnknownDecal { grid, id: uid });
        }
        if !self.catalog.is_known_kind(kind) {
            return Err(DecalError::InvalidKind(kind.to_string()));
        }
        self.restyle(grid, uid, |d| d.with_kind(kind));
        Ok(())
    }

    pub fn set_rotation(&mut self, grid: GridId, uid: DecalId, rotation: f32) -> bool {
        self.restyle(grid, uid, |d| d.with_rotation(rotation))
    }

    pub fn set_z_index(&mut self, grid: GridId, uid: DecalId, z_index: i32) -> bool {
        self.restyle(grid, uid, |d| d.with_z_index(z_index))
    }

    pub fn set_cleanable(&mut self, grid: GridId, uid: DecalId, cleanable: bool) -> bool {
        self.restyle(grid, uid, |d| d.with_cleanable(cleanable))
    }

    fn restyle<F>(&mut self, grid: GridId, uid: DecalId, update: F) -> bool
    where
        F: FnOnce(&Decal) -> Decal,
    {
        let Some(collection) = self.index.get_collection_mut(grid) else {
            return false;
        };
        let Some(updated) = collection.get(uid).map(update) else {
            return false;
        };
        match collection.replace(uid, updated) {
            Some(coord) => {
                self.dirty.mark(grid, coord);
                true
            }
            None => false,
        }
    }

    /// Mark a chunk as changed without touching its content.
    pub(crate) fn mark_dirty(&mut self, grid: GridId, coord: ChunkCoord) {
        self.dirty.mark(grid, coord);
    }

    /// Forget a destroyed grid along with its pending dirty chunks.
    pub fn remove_grid(&mut self, grid: GridId) {
        if let Some(collection) = self.index.remove_grid(grid) {
            log::info!(
                "Dropped {} decals of removed grid {:?}",
                collection.decal_count(),
                grid
            );
        }
        self.dirty.forget_grid(grid);
    }
}
