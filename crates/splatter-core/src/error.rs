use crate::types::{DecalId, GridId, TileCoord};
use thiserror::Error;

/// Reasons a decal mutation was rejected. No state changes when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecalError {
    #[error("unknown decal kind '{0}'")]
    UnknownKind(String),

    #[error("grid {0:?} does not exist")]
    GridNotFound(GridId),

    #[error("tile {tile} on grid {grid:?} cannot hold decals")]
    UnsupportedTile { grid: GridId, tile: TileCoord },

    #[error("grid {0:?} has no decal ids left")]
    IdsExhausted(GridId),

    #[error("decal {id} not found on grid {grid:?}")]
    UnknownDecal { grid: GridId, id: DecalId },

    /// A caller tried to restyle an existing decal to a kind the catalog
    /// does not know. Kept apart from `UnknownKind` so configuration errors
    /// and stale ids can be told apart.
    #[error("tried to set decal kind to invalid kind '{0}'")]
    InvalidKind(String),
}
