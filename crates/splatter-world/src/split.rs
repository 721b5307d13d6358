use crate::store::DecalStore;
use glam::Vec2;
use splatter_core::math::{chunk_coord_of, Aabb2};
use splatter_core::services::GridService;
use splatter_core::types::{DecalId, GridId};

/// Part of `old_grid` was split off into the freshly created `new_grid`.
/// Tile indices are shared between the two grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSplit {
    pub old_grid: GridId,
    pub new_grid: GridId,
}

/// Move decals lying on tiles that now belong to `new_grid` over to it.
///
/// Each tile of the new grid is handled on its own: decals in the old grid's
/// chunk for that tile whose position is within the tile bounds (widened by
/// `epsilon`) are removed from the old grid and inserted into the new one with
/// ids from the new grid's counter. A decal can only move once because it is
/// gone from the old chunk after the first match. Returns the number moved.
pub fn transfer_split_decals(
    store: &mut DecalStore,
    grids: &dyn GridService,
    event: &GridSplit,
    epsilon: f32,
) -> usize {
    let mut moved = 0;

    for tile in grids.grid_tiles(event.new_grid) {
        let coord = chunk_coord_of(tile.indices.as_vec2());
        let bounds = Aabb2::tile(tile.indices, epsilon);

        let old_chunk = store.index().chunk_at(event.old_grid, coord);
        let matching: Vec<(DecalId, Vec2)> = match old_chunk {
            Some(chunk) => chunk
                .iter()
                .filter(|(_, decal)| bounds.contains(decal.position))
                .map(|(uid, decal)| (*uid, decal.position))
                .collect(),
            None => continue,
        };

        for (uid, position) in matching {
            if store
                .set_position(event.old_grid, uid, event.new_grid, position)
                .is_some()
            {
                moved += 1;
            }
        }
    }

    if moved > 0 {
        log::info!(
            "Grid split {:?} -> {:?}: transferred {} decals",
            event.old_grid,
            event.new_grid,
            moved
        );
    }
    moved
}
