pub mod chunk;
pub mod chunk_index;
pub mod dirty;
pub mod split;
pub mod store;
pub mod tile_change;

pub use chunk::{DecalChunk, GridChunkCollection};
pub use chunk_index::ChunkIndex;
pub use dirty::DirtySet;
pub use split::{transfer_split_decals, GridSplit};
pub use store::DecalStore;
pub use tile_change::{process_tile_change, TileChanged};
