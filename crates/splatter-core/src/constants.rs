//! Shared constants. `CHUNK_SIZE` must match the value the client renderer
//! uses to bucket decals, otherwise chunk coordinates disagree on the wire.

/// Side length of a decal chunk in tiles.
pub const CHUNK_SIZE: u32 = 32;

/// Offset from a decal's stored position to the centre of its tile.
pub const TILE_CENTER_OFFSET: f32 = 0.5;

/// Radius used by client "remove decal near point" requests.
pub const DEFAULT_REMOVAL_RADIUS: f32 = 0.75;

/// Tile bounds are widened by this much when matching decals during a grid split.
pub const SPLIT_BOUNDS_EPSILON: f32 = 0.01;

/// Maximum number of idle scratch collections retained by a sync pool.
pub const DEFAULT_POOL_CAPACITY: usize = 64;

/// Tile type id reserved for empty space. Decals cannot sit on it.
pub const SPACE_TILE: u16 = 0;
