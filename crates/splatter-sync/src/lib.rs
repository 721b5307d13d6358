pub mod engine;
pub mod payload;
pub mod pool;
pub mod visibility;

pub use engine::SyncEngine;
pub use payload::{DecalChunkUpdate, DecalSink};
pub use pool::{ChunkView, ObjectPool, ScratchPools};
pub use visibility::VisibilityResolver;
