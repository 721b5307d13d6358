//! Collaborator interfaces. The decal store never owns tiles, transforms,
//! sessions or permissions; the host game provides them through these traits.

use crate::math::Aabb2;
use crate::types::{EntityId, GridId, MapId, SessionId, TileRef};
use glam::{Affine2, Vec2};

/// Catalog of decal kinds the game knows how to render.
pub trait DecalCatalog {
    fn is_known_kind(&self, kind: &str) -> bool;
}

/// Tile and grid lookups.
pub trait GridService {
    fn grid_exists(&self, grid: GridId) -> bool;

    /// Tile under a grid-local position. `None` if the grid does not exist.
    fn tile_at(&self, grid: GridId, position: Vec2) -> Option<TileRef>;

    /// True for tiles that cannot carry decals (empty space).
    fn tile_is_unsupported(&self, tile: &TileRef) -> bool;

    /// Every non-empty tile currently on `grid`.
    fn grid_tiles(&self, grid: GridId) -> Vec<TileRef>;
}

/// World-space placement of grids.
pub trait TransformService {
    /// Matrix taking world-space points into `grid`'s local space.
    fn inv_world_matrix(&self, grid: GridId) -> Affine2;

    /// Grids on `map` whose world-space bounds overlap `world_bounds`.
    fn find_grids_intersecting(&self, map: MapId, world_bounds: &Aabb2) -> Vec<GridId>;
}

/// Per-entity view regions.
pub trait ViewService {
    /// World-space view bounds of `entity` and the map it is on.
    fn view_bounds(&self, entity: EntityId) -> Option<(MapId, Aabb2)>;
}

/// A session that is in game, with everything it currently looks through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerSession {
    pub id: SessionId,
    pub attached_entity: Option<EntityId>,
    pub view_subscriptions: Vec<EntityId>,
}

impl ViewerSession {
    pub fn new(id: SessionId, attached_entity: Option<EntityId>) -> Self {
        Self {
            id,
            attached_entity,
            view_subscriptions: Vec::new(),
        }
    }

    /// Entities this session observes: its attached entity plus any view
    /// subscriptions, deduplicated. A session without an attached entity
    /// observes nothing.
    pub fn observed_entities(&self) -> Vec<EntityId> {
        let Some(attached) = self.attached_entity else {
            return Vec::new();
        };
        let mut observed = Vec::with_capacity(1 + self.view_subscriptions.len());
        observed.push(attached);
        observed.extend(self.view_subscriptions.iter().copied());
        observed.sort_unstable();
        observed.dedup();
        observed
    }
}

/// Enumerates sessions that are currently in game.
pub trait SessionService {
    fn in_game_sessions(&self) -> Vec<ViewerSession>;
}

/// Admin permission checks for client-originated edits.
pub trait PermissionService {
    fn can_edit_decals(&self, session: SessionId) -> bool;
}
