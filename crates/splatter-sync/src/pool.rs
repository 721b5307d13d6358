use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasher, Hash};

use splatter_core::types::{ChunkCoord, GridId};

/// Chunk coordinates visible per grid.
pub type ChunkView = HashMap<GridId, HashSet<ChunkCoord>>;

/// Objects that can be emptied for reuse.
pub trait Recycle {
    fn recycle(&mut self);
}

impl<T, S> Recycle for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn recycle(&mut self) {
        self.clear();
    }
}

impl<K, V, S> Recycle for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn recycle(&mut self) {
        self.clear();
    }
}

/// Bounded free list of scratch objects.
///
/// `put` takes the object by value, so a returned object can no longer be
/// reached by the caller. Objects are recycled on return and anything beyond
/// `capacity` is dropped.
#[derive(Debug)]
pub struct ObjectPool<T> {
    free: Vec<T>,
    capacity: usize,
}

impl<T: Default + Recycle> ObjectPool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Take an empty object, reusing a returned one when available.
    pub fn get(&mut self) -> T {
        self.free.pop().unwrap_or_default()
    }

    pub fn put(&mut self, mut item: T) {
        item.recycle();
        if self.free.len() < self.capacity {
            self.free.push(item);
        }
    }

    /// Number of idle objects ready for reuse.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}

/// The two pools used per tick: chunk sets and per-grid views.
#[derive(Debug)]
pub struct ScratchPools {
    sets: ObjectPool<HashSet<ChunkCoord>>,
    views: ObjectPool<ChunkView>,
}

impl ScratchPools {
    pub fn new(capacity: usize) -> Self {
        Self {
            sets: ObjectPool::new(capacity),
            views: ObjectPool::new(capacity),
        }
    }

    pub fn get_set(&mut self) -> HashSet<ChunkCoord> {
        self.sets.get()
    }

    pub fn put_set(&mut self, set: HashSet<ChunkCoord>) {
        self.sets.put(set);
    }

    pub fn get_view(&mut self) -> ChunkView {
        self.views.get()
    }

    /// Return a view and every set it holds.
    pub fn put_view(&mut self, mut view: ChunkView) {
        for (_, set) in view.drain() {
            self.sets.put(set);
        }
        self.views.put(view);
    }

    pub fn available_sets(&self) -> usize {
        self.sets.available()
    }

    pub fn available_views(&self) -> usize {
        self.views.available()
    }
}
