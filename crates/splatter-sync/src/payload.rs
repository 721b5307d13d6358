use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use splatter_core::types::{ChunkCoord, GridId, SessionId};
use splatter_world::DecalChunk;

/// Delta sent to one viewer.
///
/// `updated` carries the full current content of each listed chunk (empty if
/// the chunk has since been vacated); `removed` lists chunks the client should
/// drop, without content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecalChunkUpdate {
    pub updated: HashMap<GridId, HashMap<ChunkCoord, DecalChunk>>,
    pub removed: HashMap<GridId, HashSet<ChunkCoord>>,
}

impl DecalChunkUpdate {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn updated_chunk_count(&self) -> usize {
        self.updated.values().map(|c| c.len()).sum()
    }

    pub fn removed_chunk_count(&self) -> usize {
        self.removed.values().map(|c| c.len()).sum()
    }

    /// Content sent for one chunk, if it is part of the update.
    pub fn chunk(&self, grid: GridId, coord: ChunkCoord) -> Option<&DecalChunk> {
        self.updated.get(&grid)?.get(&coord)
    }

    pub fn is_removed(&self, grid: GridId, coord: ChunkCoord) -> bool {
        self.removed
            .get(&grid)
            .is_some_and(|chunks| chunks.contains(&coord))
    }
}

/// Outbound network boundary. Delivery is fire-and-forget.
pub trait DecalSink {
    fn send(&mut self, session: SessionId, update: DecalChunkUpdate);
}

/// Collects payloads in memory, in send order.
impl DecalSink for Vec<(SessionId, DecalChunkUpdate)> {
    fn send(&mut self, session: SessionId, update: DecalChunkUpdate) {
        self.push((session, update));
    }
}
