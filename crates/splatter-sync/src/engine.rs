use std::collections::{HashMap, HashSet};

use crate::payload::{DecalChunkUpdate, DecalSink};
use crate::pool::{ChunkView, ScratchPools};
use crate::visibility::VisibilityResolver;
use splatter_core::services::ViewerSession;
use splatter_core::types::{ChunkCoord, GridId, SessionId};
use splatter_world::{ChunkIndex, DecalChunk, DirtySet};

/// Per-viewer delta synchronization.
///
/// Keeps, for every tracked session, the chunk view it was last sent. Each
/// tick the view is recomputed and compared against that state and against
/// the tick's dirty chunks to decide what the client must receive.
pub struct SyncEngine {
    previous: HashMap<SessionId, ChunkView>,
    pools: ScratchPools,
}

impl SyncEngine {
    pub fn new(pool_capacity: usize) -> Self {
        Self {
            previous: HashMap::new(),
            pools: ScratchPools::new(pool_capacity),
        }
    }

    /// Start tracking a session that just entered the game. The client holds
    /// nothing yet, so its first sync sends every visible chunk.
    pub fn session_entered(&mut self, session: SessionId) {
        let fresh = self.pools.get_view();
        if let Some(old) = self.previous.insert(session, fresh) {
            self.pools.put_view(old);
        }
    }

    pub fn session_disconnected(&mut self, session: SessionId) {
        if let Some(old) = self.previous.remove(&session) {
            self.pools.put_view(old);
        }
    }

    pub fn is_tracking(&self, session: SessionId) -> bool {
        self.previous.contains_key(&session)
    }

    /// Chunk view last sent to `session`.
    pub fn previous_view(&self, session: SessionId) -> Option<&ChunkView> {
        self.previous.get(&session)
    }

    pub fn tracked_sessions(&self) -> usize {
        self.previous.len()
    }

    pub fn pools(&self) -> &ScratchPools {
        &self.pools
    }

    /// Compute the delta for one session. Returns `None` when nothing needs to
    /// be sent, in which case the stored view is left as it was.
    pub fn sync_session(
        &mut self,
        session: &ViewerSession,
        index: &ChunkIndex,
        dirty: &DirtySet,
        resolver: &VisibilityResolver<'_>,
    ) -> Option<DecalChunkUpdate> {
        let previous = self.previous.get(&session.id)?;
        let visible = resolver.resolve(&session.observed_entities(), &mut self.pools);

        // Chunks the client holds that went out of view.
        let mut stale: HashMap<GridId, HashSet<ChunkCoord>> = HashMap::new();
        for (grid, old_chunks) in previous {
            match visible.get(grid) {
                None => {
                    if !old_chunks.is_empty() {
                        stale.insert(*grid, old_chunks.clone());
                    }
                }
                Some(now) => {
                    let gone: HashSet<ChunkCoord> = old_chunks.difference(now).copied().collect();
                    if !gone.is_empty() {
                        stale.insert(*grid, gone);
                    }
                }
            }
        }

        // Chunks entering view, plus visible chunks changed this tick.
        let mut updated = self.pools.get_view();
        for (grid, chunks) in &visible {
            let known = previous.get(grid);
            let mut send = self.pools.get_set();
            send.extend(
                chunks
                    .iter()
                    .filter(|c| !known.is_some_and(|k| k.contains(*c)))
                    .copied(),
            );
            if let Some(changed) = dirty.chunks(*grid) {
                send.extend(chunks.intersection(changed).copied());
            }

            if send.is_empty() {
                self.pools.put_set(send);
            } else {
                updated.insert(*grid, send);
            }
        }

        if updated.is_empty() && stale.is_empty() {
            self.pools.put_view(updated);
            self.pools.put_view(visible);
            return None;
        }

        let payload = DecalChunkUpdate {
            updated: Self::collect_content(index, &updated),
            removed: stale,
        };
        self.pools.put_view(updated);

        if let Some(old) = self.previous.insert(session.id, visible) {
            self.pools.put_view(old);
        }
        Some(payload)
    }

    fn collect_content(
        index: &ChunkIndex,
        updated: &ChunkView,
    ) -> HashMap<GridId, HashMap<ChunkCoord, DecalChunk>> {
        updated
            .iter()
            .map(|(grid, chunks)| {
                let content = chunks
                    .iter()
                    .map(|coord| {
                        let chunk = index.chunk_at(*grid, *coord).cloned().unwrap_or_default();
                        (*coord, chunk)
                    })
                    .collect();
                (*grid, content)
            })
            .collect()
    }

    /// Run one sync tick over every in-game session and consume the tick's
    /// dirty set. Sessions that were never announced through
    /// `session_entered` are skipped. Returns the number of payloads sent.
    pub fn tick(
        &mut self,
        sessions: &[ViewerSession],
        index: &ChunkIndex,
        dirty: DirtySet,
        resolver: &VisibilityResolver<'_>,
        sink: &mut dyn DecalSink,
    ) -> usize {
        let mut sent = 0;
        for session in sessions {
            if !self.is_tracking(session.id) {
                log::debug!("Skipping decal sync for untracked session {:?}", session.id);
                continue;
            }
            if let Some(update) = self.sync_session(session, index, &dirty, resolver) {
                log::trace!(
                    "Decal sync to {:?}: {} updated, {} removed",
                    session.id,
                    update.updated_chunk_count(),
                    update.removed_chunk_count()
                );
                sink.send(session.id, update);
                sent += 1;
            }
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec2, Vec2};
    use splatter_core::testkit::{FlatWorld, StaticCatalog};
    use splatter_core::types::{EntityId, GridCoordinates, MapId};
    use splatter_core::{Aabb2, Decal};
    use splatter_world::DecalStore;

    const GRID: GridId = GridId(1);
    const VIEWER: SessionId = SessionId(10);
    const EYE: EntityId = EntityId(100);

    struct Fixture {
        world: FlatWorld,
        store: DecalStore,
        engine: SyncEngine,
        sessions: Vec<ViewerSession>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut world = FlatWorld::new();
            world.add_grid(GRID, MapId(0), Vec2::ZERO);
            world.fill_tiles(GRID, IVec2::new(-64, -64), IVec2::new(191, 191));
            let mut engine = SyncEngine::new(16);
            engine.session_entered(VIEWER);
            let mut fixture = Self {
                world,
                store: DecalStore::new(Box::new(StaticCatalog::new(["blood"]))),
                engine,
                sessions: vec![ViewerSession::new(VIEWER, Some(EYE))],
            };
            fixture.look_at_chunk(0, 0);
            fixture
        }

        /// Point the viewer at the interior of a single chunk.
        fn look_at_chunk(&mut self, x: i32, y: i32) {
            let center = Vec2::new(x as f32 * 32.0 + 16.0, y as f32 * 32.0 + 16.0);
            self.look(Aabb2::from_center(center, Vec2::splat(10.0)));
        }

        fn look(&mut self, bounds: Aabb2) {
            self.world.set_view(EYE, MapId(0), bounds);
        }

        fn add(&mut self, x: f32, y: f32) -> u32 {
            let pos = Vec2::new(x, y);
            self.store
                .add_decal(&self.world, Decal::new(pos, "blood"), GridCoordinates::new(GRID, pos))
                .expect("add")
        }

        fn tick(&mut self) -> Vec<(SessionId, DecalChunkUpdate)> {
            let dirty = self.store.take_dirty();
            let resolver = VisibilityResolver::new(&self.world, &self.world);
            let mut sink: Vec<(SessionId, DecalChunkUpdate)> = Vec::new();
            let sent = self
                .engine
                .tick(&self.sessions, self.store.index(), dirty, &resolver, &mut sink);
            assert_eq!(sent, sink.len());
            sink
        }

        fn previous(&self) -> HashSet<ChunkCoord> {
            self.engine
                .previous_view(VIEWER)
                .and_then(|v| v.get(&GRID))
                .cloned()
                .unwrap_or_default()
        }
    }

    fn coords(list: &[(i32, i32)]) -> HashSet<ChunkCoord> {
        list.iter().map(|(x, y)| IVec2::new(*x, *y)).collect()
    }

    #[test]
    fn test_three_tick_scenario() {
        let mut fx = Fixture::new();
        let first = fx.add(4.0, 4.0);

        // Tick 1: chunk comes into view with its content.
        let sent = fx.tick();
        assert_eq!(sent.len(), 1);
        let (session, update) = &sent[0];
        assert_eq!(*session, VIEWER);
        let chunk = update.chunk(GRID, IVec2::ZERO).expect("chunk (0,0)");
        assert!(chunk.contains_key(&first));
        assert!(update.removed.is_empty());

        // Tick 2: nothing changed.
        let before = fx.previous();
        assert!(fx.tick().is_empty());
        assert_eq!(fx.previous(), before);

        // Tick 3: a new decal lands in the visible chunk.
        let second = fx.add(6.0, 6.0);
        let sent = fx.tick();
        assert_eq!(sent.len(), 1);
        let update = &sent[0].1;
        let chunk = update.chunk(GRID, IVec2::ZERO).expect("chunk (0,0)");
        assert_eq!(chunk.len(), 2);
        assert!(chunk.contains_key(&second));
        assert!(update.removed.is_empty());
    }

    #[test]
    fn test_newly_observed_chunk_sent_without_dirty() {
        let mut fx = Fixture::new();
        let far = fx.add(70.0, 4.0);
        fx.tick();

        fx.look_at_chunk(2, 0);
        let sent = fx.tick();
        assert_eq!(sent.len(), 1);
        let update = &sent[0].1;
        let chunk = update.chunk(GRID, IVec2::new(2, 0)).expect("chunk (2,0)");
        assert!(chunk.contains_key(&far));
        assert!(update.is_removed(GRID, IVec2::ZERO));
    }

    #[test]
    fn test_lost_chunk_is_removed() {
        let mut fx = Fixture::new();
        fx.look(Aabb2::new(Vec2::new(1.0, 1.0), Vec2::new(40.0, 10.0)));
        fx.tick();
        assert_eq!(fx.previous(), coords(&[(0, 0), (1, 0)]));

        fx.look_at_chunk(1, 0);
        let sent = fx.tick();
        assert_eq!(sent.len(), 1);
        let update = &sent[0].1;
        assert!(update.updated.is_empty());
        assert_eq!(update.removed[&GRID], coords(&[(0, 0)]));
        assert_eq!(fx.previous(), coords(&[(1, 0)]));
    }

    #[test]
    fn test_grid_out_of_view_removes_all_its_chunks() {
        let mut fx = Fixture::new();
        fx.look(Aabb2::new(Vec2::new(1.0, 1.0), Vec2::new(40.0, 10.0)));
        fx.tick();

        fx.world.clear_view(EYE);
        let sent = fx.tick();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.removed[&GRID], coords(&[(0, 0), (1, 0)]));
        assert!(fx.engine.previous_view(VIEWER).expect("tracked").is_empty());
    }

    #[test]
    fn test_dirty_chunk_out_of_view_not_sent() {
        let mut fx = Fixture::new();
        fx.tick();
        fx.add(100.0, 100.0);
        assert!(fx.tick().is_empty());
    }

    #[test]
    fn test_vacated_chunk_sent_empty() {
        let mut fx = Fixture::new();
        let uid = fx.add(4.0, 4.0);
        fx.tick();

        assert!(fx.store.remove_decal(GRID, uid));
        let sent = fx.tick();
        assert_eq!(sent.len(), 1);
        let chunk = sent[0].1.chunk(GRID, IVec2::ZERO).expect("chunk listed");
        assert!(chunk.is_empty());
    }

    #[test]
    fn test_stored_view_keeps_clean_visible_chunks() {
        let mut fx = Fixture::new();
        fx.look(Aabb2::new(Vec2::new(1.0, 1.0), Vec2::new(40.0, 10.0)));
        fx.tick();

        // Only (0,0) changes; (1,0) must still be remembered as held.
        fx.add(2.0, 2.0);
        let sent = fx.tick();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.updated[&GRID].len(), 1);
        assert_eq!(fx.previous(), coords(&[(0, 0), (1, 0)]));

        assert!(fx.tick().is_empty());
    }

    #[test]
    fn test_untracked_and_disconnected_sessions_skipped() {
        let mut fx = Fixture::new();
        fx.sessions.push(ViewerSession::new(SessionId(11), Some(EYE)));
        let sent = fx.tick();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, VIEWER);

        fx.engine.session_disconnected(VIEWER);
        assert!(!fx.engine.is_tracking(VIEWER));
        fx.add(3.0, 3.0);
        assert!(fx.tick().is_empty());
    }

    #[test]
    fn test_reentering_session_resends_everything() {
        let mut fx = Fixture::new();
        fx.add(3.0, 3.0);
        fx.tick();
        assert!(fx.tick().is_empty());

        fx.engine.session_entered(VIEWER);
        let sent = fx.tick();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.updated_chunk_count(), 1);
    }

    #[test]
    fn test_scratch_collections_return_to_pool() {
        let mut fx = Fixture::new();
        for tick in 0..6 {
            fx.look_at_chunk(tick % 3, 0);
            fx.tick();
        }
        assert!(fx.engine.pools().available_views() > 0);
        assert!(fx.engine.pools().available_sets() > 0);
        assert_eq!(fx.previous(), coords(&[(2, 0)]));
    }
}
