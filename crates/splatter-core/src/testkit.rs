//! In-memory collaborators for tests and benchmarks.
//!
//! `FlatWorld` holds grids as plain tile maps with a rigid world transform,
//! plus entity view bounds. It implements every spatial service the decal
//! store consumes.

use std::collections::{HashMap, HashSet};

use crate::constants::SPACE_TILE;
use crate::math::{tile_of, Aabb2};
use crate::services::{
    DecalCatalog, GridService, PermissionService, SessionService, TransformService, ViewService,
    ViewerSession,
};
use crate::types::{EntityId, GridId, MapId, SessionId, TileCoord, TileRef};
use glam::{Affine2, IVec2, Vec2};

/// Tile type used by `fill_tiles` when the caller does not care.
pub const FLOOR_TILE: u16 = 1;

struct TestGrid {
    map: MapId,
    world: Affine2,
    tiles: HashMap<TileCoord, u16>,
}

#[derive(Default)]
pub struct FlatWorld {
    grids: HashMap<GridId, TestGrid>,
    views: HashMap<EntityId, (MapId, Aabb2)>,
}

impl FlatWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty grid whose origin sits at `origin` in world space.
    pub fn add_grid(&mut self, grid: GridId, map: MapId, origin: Vec2) {
        self.grids.insert(
            grid,
            TestGrid {
                map,
                world: Affine2::from_translation(origin),
                tiles: HashMap::new(),
            },
        );
    }

    pub fn remove_grid(&mut self, grid: GridId) {
        self.grids.remove(&grid);
    }

    /// Place a grid in world space with a rotation (radians) about its origin.
    pub fn set_grid_transform(&mut self, grid: GridId, origin: Vec2, rotation: f32) {
        if let Some(g) = self.grids.get_mut(&grid) {
            g.world = Affine2::from_angle_translation(rotation, origin);
        }
    }

    pub fn set_tile(&mut self, grid: GridId, tile: TileCoord, type_id: u16) {
        if let Some(g) = self.grids.get_mut(&grid) {
            if type_id == SPACE_TILE {
                g.tiles.remove(&tile);
            } else {
                g.tiles.insert(tile, type_id);
            }
        }
    }

    /// Fill the inclusive tile rectangle `min..=max` with floor tiles.
    pub fn fill_tiles(&mut self, grid: GridId, min: TileCoord, max: TileCoord) {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                self.set_tile(grid, IVec2::new(x, y), FLOOR_TILE);
            }
        }
    }

    /// Move tiles from one grid to another, keeping their indices.
    pub fn move_tiles(&mut self, from: GridId, to: GridId, tiles: &[TileCoord]) {
        let mut moved = Vec::with_capacity(tiles.len());
        if let Some(src) = self.grids.get_mut(&from) {
            for tile in tiles {
                if let Some(type_id) = src.tiles.remove(tile) {
                    moved.push((*tile, type_id));
                }
            }
        }
        if let Some(dst) = self.grids.get_mut(&to) {
            dst.tiles.extend(moved);
        }
    }

    pub fn set_view(&mut self, entity: EntityId, map: MapId, bounds: Aabb2) {
        self.views.insert(entity, (map, bounds));
    }

    pub fn clear_view(&mut self, entity: EntityId) {
        self.views.remove(&entity);
    }

    fn local_bounds(grid: &TestGrid) -> Option<Aabb2> {
        let mut tiles = grid.tiles.keys();
        let first = tiles.next()?.as_vec2();
        let (min, max) = tiles.fold((first, first), |(lo, hi), t| {
            let p = t.as_vec2();
            (lo.min(p), hi.max(p))
        });
        Some(Aabb2::new(min, max + Vec2::ONE))
    }
}

impl GridService for FlatWorld {
    fn grid_exists(&self, grid: GridId) -> bool {
        self.grids.contains_key(&grid)
    }

    fn tile_at(&self, grid: GridId, position: Vec2) -> Option<TileRef> {
        let g = self.grids.get(&grid)?;
        let indices = tile_of(position);
        let type_id = g.tiles.get(&indices).copied().unwrap_or(SPACE_TILE);
        Some(TileRef {
            grid,
            indices,
            type_id,
        })
    }

    fn tile_is_unsupported(&self, tile: &TileRef) -> bool {
        tile.type_id == SPACE_TILE
    }

    fn grid_tiles(&self, grid: GridId) -> Vec<TileRef> {
        let Some(g) = self.grids.get(&grid) else {
            return Vec::new();
        };
        let mut tiles: Vec<TileRef> = g
            .tiles
            .iter()
            .map(|(indices, type_id)| TileRef {
                grid,
                indices: *indices,
                type_id: *type_id,
            })
            .collect();
        tiles.sort_by_key(|t| (t.indices.y, t.indices.x));
        tiles
    }
}

impl TransformService for FlatWorld {
    fn inv_world_matrix(&self, grid: GridId) -> Affine2 {
        self.grids
            .get(&grid)
            .map(|g| g.world.inverse())
            .unwrap_or(Affine2::IDENTITY)
    }

    fn find_grids_intersecting(&self, map: MapId, world_bounds: &Aabb2) -> Vec<GridId> {
        let mut found: Vec<GridId> = self
            .grids
            .iter()
            .filter(|(_, g)| g.map == map)
            .filter_map(|(id, g)| {
                let world = Self::local_bounds(g)?.transformed(&g.world);
                world.intersects(world_bounds).then_some(*id)
            })
            .collect();
        found.sort_unstable();
        found
    }
}

impl ViewService for FlatWorld {
    fn view_bounds(&self, entity: EntityId) -> Option<(MapId, Aabb2)> {
        self.views.get(&entity).copied()
    }
}

/// Fixed set of known decal kinds.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    kinds: HashSet<String>,
}

impl StaticCatalog {
    pub fn new<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kinds: kinds.into_iter().map(Into::into).collect(),
        }
    }
}

impl DecalCatalog for StaticCatalog {
    fn is_known_kind(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }
}

/// Session list with a set of admins.
#[derive(Debug, Clone, Default)]
pub struct TestSessions {
    pub sessions: Vec<ViewerSession>,
    pub admins: HashSet<SessionId>,
}

impl TestSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&mut self, id: SessionId, attached: EntityId) {
        self.sessions.push(ViewerSession::new(id, Some(attached)));
    }

    pub fn leave(&mut self, id: SessionId) {
        self.sessions.retain(|s| s.id != id);
    }

    pub fn grant_admin(&mut self, id: SessionId) {
        self.admins.insert(id);
    }
}

impl SessionService for TestSessions {
    fn in_game_sessions(&self) -> Vec<ViewerSession> {
        self.sessions.clone()
    }
}

impl PermissionService for TestSessions {
    fn can_edit_decals(&self, session: SessionId) -> bool {
        self.admins.contains(&session)
    }
}
