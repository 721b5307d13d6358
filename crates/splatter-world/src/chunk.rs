use std::collections::{BTreeMap, HashMap};

use splatter_core::types::{ChunkCoord, DecalId};
use splatter_core::Decal;

/// Decals of one chunk, ordered by id.
pub type DecalChunk = BTreeMap<DecalId, Decal>;

/// All decal chunks of a single grid, plus the reverse index from decal id
/// to the chunk holding it and the grid's id counter.
///
/// The two maps are only ever changed together through `insert` and `remove`,
/// which keeps every id in exactly one chunk and in the reverse index.
#[derive(Debug, Default, Clone)]
pub struct GridChunkCollection {
    chunks: HashMap<ChunkCoord, DecalChunk>,
    index: HashMap<DecalId, ChunkCoord>,
    next_uid: DecalId,
}

impl GridChunkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next unused id, or `None` once the id space is used up.
    /// Ids are never handed out twice.
    pub fn allocate_uid(&mut self) -> Option<DecalId> {
        let uid = self.next_uid;
        self.next_uid = uid.checked_add(1)?;
        Some(uid)
    }

    #[cfg(test)]
    pub(crate) fn set_next_uid(&mut self, uid: DecalId) {
        self.next_uid = uid;
    }

    /// Id the next allocation will return.
    pub fn next_uid(&self) -> DecalId {
        self.next_uid
    }

    /// Store `decal` under `uid` in chunk `coord`, creating the chunk if needed.
    pub(crate) fn insert(&mut self, coord: ChunkCoord, uid: DecalId, decal: Decal) {
        self.chunks.entry(coord).or_default().insert(uid, decal);
        self.index.insert(uid, coord);
    }

    /// Remove a decal, dropping its chunk if it became empty.
    pub(crate) fn remove(&mut self, uid: DecalId) -> Option<(ChunkCoord, Decal)> {
        let coord = self.index.remove(&uid)?;
        let chunk = self.chunks.get_mut(&coord)?;
        let decal = chunk.remove(&uid)?;
        if chunk.is_empty() {
            self.chunks.remove(&coord);
        }
        Some((coord, decal))
    }

    /// Swap the stored value for `uid` with `decal`. The chunk must not change.
    pub(crate) fn replace(&mut self, uid: DecalId, decal: Decal) -> Option<ChunkCoord> {
        let coord = *self.index.get(&uid)?;
        let slot = self.chunks.get_mut(&coord)?.get_mut(&uid)?;
        *slot = decal;
        Some(coord)
    }

    pub fn chunk(&self, coord: &ChunkCoord) -> Option<&DecalChunk> {
        self.chunks.get(coord)
    }

    pub fn locate(&self, uid: DecalId) -> Option<ChunkCoord> {
        self.index.get(&uid).copied()
    }

    pub fn get(&self, uid: DecalId) -> Option<&Decal> {
        let coord = self.index.get(&uid)?;
        self.chunks.get(coord)?.get(&uid)
    }

    /// Iterator over all non-empty chunks.
    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &DecalChunk)> {
        self.chunks.iter()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn decal_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Check that chunks and reverse index agree and that no chunk is empty.
    pub fn is_consistent(&self) -> bool {
        let stored: usize = self.chunks.values().map(|c| c.len()).sum();
        if stored != self.index.len() {
            return false;
        }
        if self.chunks.values().any(|c| c.is_empty()) {
            return false;
        }
        self.chunks.iter().all(|(coord, chunk)| {
            chunk
                .keys()
                .all(|uid| self.index.get(uid) == Some(coord) && *uid < self.next_uid)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec2, Vec2};

    #[test]
    fn test_uid_allocation_is_monotonic() {
        let mut collection = GridChunkCollection::new();
        assert_eq!(collection.allocate_uid(), Some(0));
        assert_eq!(collection.allocate_uid(), Some(1));
        assert_eq!(collection.next_uid(), 2);
    }

    #[test]
    fn test_uid_allocation_stops_when_exhausted() {
        let mut collection = GridChunkCollection::new();
        collection.set_next_uid(DecalId::MAX - 1);
        assert_eq!(collection.allocate_uid(), Some(DecalId::MAX - 1));
        assert_eq!(collection.allocate_uid(), None);
        assert_eq!(collection.allocate_uid(), None);
        assert_eq!(collection.next_uid(), DecalId::MAX);
    }

    #[test]
    fn test_remove_drops_empty_chunk() {
        let mut collection = GridChunkCollection::new();
        let coord = IVec2::new(0, 0);
        let a = collection.allocate_uid().expect("uid");
        let b = collection.allocate_uid().expect("uid");
        collection.insert(coord, a, Decal::new(Vec2::new(1.0, 1.0), "blood"));
        collection.insert(coord, b, Decal::new(Vec2::new(2.0, 2.0), "blood"));
        assert!(collection.is_consistent());

        collection.remove(a);
        assert!(collection.chunk(&coord).is_some());
        collection.remove(b);
        assert!(collection.chunk(&coord).is_none());
        assert_eq!(collection.chunk_count(), 0);
        assert!(collection.is_consistent());

        // Counter does not roll back after removals.
        assert_eq!(collection.allocate_uid(), Some(2));
    }

    #[test]
    fn test_remove_unknown_uid() {
        let mut collection = GridChunkCollection::new();
        assert!(collection.remove(5).is_none());
    }

    #[test]
    fn test_chunk_iterates_in_id_order() {
        let mut collection = GridChunkCollection::new();
        let coord = IVec2::new(1, 1);
        for _ in 0..4 {
            let uid = collection.allocate_uid().expect("uid");
            collection.insert(coord, uid, Decal::new(Vec2::splat(40.0), "scorch"));
        }
        let ids: Vec<DecalId> = collection
            .chunk(&coord)
            .expect("chunk")
            .keys()
            .copied()
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
