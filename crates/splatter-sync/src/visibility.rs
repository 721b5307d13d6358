use crate::pool::{ChunkView, ScratchPools};
use splatter_core::services::{TransformService, ViewService};
use splatter_core::types::EntityId;

/// Works out which decal chunks a set of observer entities can see.
pub struct VisibilityResolver<'a> {
    views: &'a dyn ViewService,
    transforms: &'a dyn TransformService,
}

impl<'a> VisibilityResolver<'a> {
    pub fn new(views: &'a dyn ViewService, transforms: &'a dyn TransformService) -> Self {
        Self { views, transforms }
    }

    /// Union of chunks visible from every observer, per grid.
    ///
    /// Each observer's world-space view box is carried into the local space of
    /// every grid it overlaps; the chunks covered by the resulting box are
    /// visible. Observers without a view are skipped.
    pub fn resolve(&self, observers: &[EntityId], pools: &mut ScratchPools) -> ChunkView {
        let mut visible = pools.get_view();

        for observer in observers {
            let Some((map, bounds)) = self.views.view_bounds(*observer) else {
                continue;
            };

            for grid in self.transforms.find_grids_intersecting(map, &bounds) {
                let local = bounds.transformed(&self.transforms.inv_world_matrix(grid));
                let chunks = visible.entry(grid).or_insert_with(|| pools.get_set());
                chunks.extend(local.chunks());
            }
        }

        visible
    }
}
