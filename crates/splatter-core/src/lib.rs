pub mod constants;
pub mod decal;
pub mod error;
pub mod math;
pub mod services;
pub mod testkit;
pub mod types;

pub use decal::{Color, Decal};
pub use error::DecalError;
pub use math::Aabb2;
pub use types::{
    ChunkCoord, DecalId, EntityId, GridCoordinates, GridId, MapId, SessionId, TileCoord, TileRef,
};
