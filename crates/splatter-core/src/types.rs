use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Newtype for grid identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridId(pub u32);

/// Newtype for map identifiers. Grids and viewers both live on a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(pub u32);

/// Entity that can act as a view point (player body, camera, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Connected player session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

/// Decal identifier. Unique within one grid only.
pub type DecalId = u32;

/// Chunk coordinate in chunk-space (each unit = CHUNK_SIZE tiles).
pub type ChunkCoord = IVec2;

/// Tile coordinate in grid-local tile-space.
pub type TileCoord = IVec2;

/// A grid-local position on a specific grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCoordinates {
    pub grid: GridId,
    pub position: Vec2,
}

impl GridCoordinates {
    pub fn new(grid: GridId, position: Vec2) -> Self {
        Self { grid, position }
    }
}

/// One tile as reported by the grid service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRef {
    pub grid: GridId,
    pub indices: TileCoord,
    /// Tile definition id. `SPACE_TILE` means nothing is there.
    pub type_id: u16,
}
