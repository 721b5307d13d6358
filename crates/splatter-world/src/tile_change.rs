use crate::store::DecalStore;
use splatter_core::math::chunk_coord_of;
use splatter_core::services::GridService;
use splatter_core::types::{DecalId, TileRef};

/// A tile on a grid was replaced; `tile` is the new tile.
#[derive(Debug, Clone, Copy)]
pub struct TileChanged {
    pub tile: TileRef,
}

/// Drop decals sitting on a tile that just became unable to hold them.
///
/// Only decals whose anchor lies on the changed tile are removed. The chunk
/// is dirtied once however many decals go. Returns the number removed.
pub fn process_tile_change(
    store: &mut DecalStore,
    grids: &dyn GridService,
    event: &TileChanged,
) -> usize {
    if !grids.tile_is_unsupported(&event.tile) {
        return 0;
    }

    let grid = event.tile.grid;
    let coord = chunk_coord_of(event.tile.indices.as_vec2());
    let doomed: Vec<DecalId> = match store.index().chunk_at(grid, coord) {
        Some(chunk) => chunk
            .iter()
            .filter(|(_, decal)| decal.tile() == event.tile.indices)
            .map(|(uid, _)| *uid)
            .collect(),
        None => return 0,
    };
    if doomed.is_empty() {
        return 0;
    }

    for uid in &doomed {
        store.take_decal(grid, *uid);
    }
    store.mark_dirty(grid, coord);

    log::debug!(
        "Tile {} on grid {:?} became unsupported, removed {} decals",
        event.tile.indices,
        grid,
        doomed.len()
    );
    doomed.len()
}
