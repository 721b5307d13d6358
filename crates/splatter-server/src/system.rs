use crate::config::DecalConfig;
use crate::requests::{PlaceDecalRequest, RemoveDecalRequest};
use crate::session::{SessionStatus, SessionStatusChanged};
use splatter_core::services::{
    DecalCatalog, GridService, PermissionService, SessionService, TransformService, ViewService,
};
use splatter_core::types::{DecalId, GridId, SessionId};
use splatter_sync::{DecalSink, SyncEngine, VisibilityResolver};
use splatter_world::{
    process_tile_change, transfer_split_decals, DecalStore, GridSplit, TileChanged,
};

/// Collaborators read during a sync tick.
pub struct TickServices<'a> {
    pub sessions: &'a dyn SessionService,
    pub views: &'a dyn ViewService,
    pub transforms: &'a dyn TransformService,
}

/// Server-side decal system: the store, the per-viewer sync engine, and the
/// handlers for world events and client requests that feed them.
pub struct DecalSystem {
    config: DecalConfig,
    store: DecalStore,
    sync: SyncEngine,
}

impl DecalSystem {
    pub fn new(config: DecalConfig, catalog: Box<dyn DecalCatalog>) -> Self {
        let sync = SyncEngine::new(config.pool_capacity);
        Self {
            config,
            store: DecalStore::new(catalog),
            sync,
        }
    }

    pub fn config(&self) -> &DecalConfig {
        &self.config
    }

    pub fn store(&self) -> &DecalStore {
        &self.store
    }

    /// Mutation API for other server systems.
    pub fn store_mut(&mut self) -> &mut DecalStore {
        &mut self.store
    }

    pub fn sync(&self) -> &SyncEngine {
        &self.sync
    }

    pub fn on_session_status_changed(&mut self, event: &SessionStatusChanged) {
        match event.new_status {
            SessionStatus::InGame => {
                log::info!("Session {:?} entered game, tracking decal view", event.session);
                self.sync.session_entered(event.session);
            }
            SessionStatus::Disconnected => {
                log::info!("Session {:?} disconnected, dropping decal view", event.session);
                self.sync.session_disconnected(event.session);
            }
            SessionStatus::Connecting | SessionStatus::Connected => {}
        }
    }

    /// Handle a client placement request. Requests from sessions without edit
    /// permission are dropped without a reply.
    pub fn on_place_request(
        &mut self,
        sender: SessionId,
        request: &PlaceDecalRequest,
        grids: &dyn GridService,
        permissions: &dyn PermissionService,
    ) -> Option<DecalId> {
        if !permissions.can_edit_decals(sender) {
            log::warn!("Session {:?} tried to place a decal without permission", sender);
            return None;
        }

        match self
            .store
            .add_decal(grids, request.to_decal(), request.coordinates)
        {
            Ok(uid) => Some(uid),
            Err(e) => {
                log::debug!("Rejected decal placement from {:?}: {e}", sender);
                None
            }
        }
    }

    /// Handle a client removal request: every decal within the configured
    /// radius of the point, on the same grid, is removed. Returns how many.
    pub fn on_remove_request(
        &mut self,
        sender: SessionId,
        request: &RemoveDecalRequest,
        grids: &dyn GridService,
        permissions: &dyn PermissionService,
    ) -> usize {
        if !permissions.can_edit_decals(sender) {
            log::warn!("Session {:?} tried to remove decals without permission", sender);
            return 0;
        }

        let grid = request.coordinates.grid;
        if !grids.grid_exists(grid) {
            return 0;
        }

        let nearby = self.store.index().decals_near(
            grid,
            request.coordinates.position,
            self.config.removal_radius,
        );
        let mut removed = 0;
        for (uid, _) in nearby {
            if self.store.remove_decal(grid, uid) {
                removed += 1;
            }
        }
        removed
    }

    pub fn on_tile_changed(&mut self, grids: &dyn GridService, event: &TileChanged) -> usize {
        process_tile_change(&mut self.store, grids, event)
    }

    pub fn on_grid_split(&mut self, grids: &dyn GridService, event: &GridSplit) -> usize {
        transfer_split_decals(&mut self.store, grids, event, self.config.split_epsilon)
    }

    pub fn on_grid_removed(&mut self, grid: GridId) {
        self.store.remove_grid(grid);
    }

    /// Run the per-tick sync for every in-game session, then start a new
    /// dirty set. Returns the number of payloads handed to `sink`.
    pub fn update(&mut self, services: &TickServices<'_>, sink: &mut dyn DecalSink) -> usize {
        let sessions = services.sessions.in_game_sessions();
        let dirty = self.store.take_dirty();
        let resolver = VisibilityResolver::new(services.views, services.transforms);
        self.sync
            .tick(&sessions, self.store.index(), dirty, &resolver, sink)
    }
}
