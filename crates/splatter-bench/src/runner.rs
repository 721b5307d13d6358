use std::collections::VecDeque;
use std::time::Instant;

use glam::{IVec2, Vec2};
use splatter_core::testkit::{FlatWorld, StaticCatalog, TestSessions};
use splatter_core::types::{DecalId, EntityId, GridCoordinates, GridId, MapId, SessionId};
use splatter_core::{Aabb2, Decal};
use splatter_server::{DecalConfig, DecalSystem, SessionStatus, SessionStatusChanged, TickServices};
use splatter_sync::{DecalChunkUpdate, DecalSink};

use crate::scenes::{hash_to_range, scatter_hash, SceneConfig};

const STATION: GridId = GridId(1);
const MAP: MapId = MapId(0);
const KINDS: [&str; 3] = ["blood", "vomit", "scorch"];

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub decal_count: u32,
    pub viewers: u32,
    pub tick_count: u32,
    pub payloads_sent: u64,
    pub chunks_sent: u64,
    pub timings: TimingSeries,
}

/// Sink that only tallies what would have gone over the wire.
#[derive(Default)]
struct CountingSink {
    payloads: u64,
    chunks: u64,
}

impl DecalSink for CountingSink {
    fn send(&mut self, _session: SessionId, update: DecalChunkUpdate) {
        self.payloads += 1;
        self.chunks += (update.updated_chunk_count() + update.removed_chunk_count()) as u64;
    }
}

/// Runs decal sync scenes against the in-memory world.
pub struct BenchmarkRunner {
    tick_count: u32,
    config: DecalConfig,
}

impl BenchmarkRunner {
    pub fn new(tick_count: u32) -> Self {
        Self {
            tick_count,
            config: DecalConfig::default(),
        }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, scene: &SceneConfig) -> BenchmarkResult {
        log::info!(
            "Running scene '{}' ({} decals, {} viewers)...",
            scene.name,
            scene.initial_decals,
            scene.viewers
        );

        let extent = scene.grid_tiles() as f32;
        let mut world = FlatWorld::new();
        world.add_grid(STATION, MAP, Vec2::ZERO);
        world.fill_tiles(
            STATION,
            IVec2::ZERO,
            IVec2::splat(scene.grid_tiles() as i32 - 1),
        );

        let mut sessions = TestSessions::new();
        let mut system = DecalSystem::new(self.config.clone(), Box::new(StaticCatalog::new(KINDS)));
        for v in 0..scene.viewers {
            let session = SessionId(v as u64);
            sessions.join(session, EntityId(v as u64));
            system.on_session_status_changed(&SessionStatusChanged {
                session,
                new_status: SessionStatus::InGame,
            });
        }

        let mut live: VecDeque<DecalId> = VecDeque::with_capacity(scene.initial_decals as usize);
        for i in 0..scene.initial_decals {
            if let Some(uid) = place(&mut system, &world, i, 0, extent) {
                live.push_back(uid);
            }
        }
        log::info!("  Populated {} decals", live.len());

        let mut sink = CountingSink::default();
        let mut frame_times = Vec::with_capacity(self.tick_count as usize);

        for tick in 1..=self.tick_count {
            for v in 0..scene.viewers {
                let center = Vec2::new(
                    hash_to_range(scatter_hash(v, 0, tick / 8), extent),
                    hash_to_range(scatter_hash(v, 1, tick / 8), extent),
                );
                world.set_view(
                    EntityId(v as u64),
                    MAP,
                    Aabb2::from_center(center, Vec2::splat(scene.view_half_extent)),
                );
            }

            for i in 0..scene.churn_per_tick {
                if let Some(uid) = live.pop_front() {
                    system.store_mut().remove_decal(STATION, uid);
                }
                if let Some(uid) = place(&mut system, &world, i, tick, extent) {
                    live.push_back(uid);
                }
            }

            let services = TickServices {
                sessions: &sessions,
                views: &world,
                transforms: &world,
            };
            let frame_start = Instant::now();
            system.update(&services, &mut sink);
            frame_times.push(frame_start.elapsed().as_secs_f64() * 1000.0);
        }

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: mean={:.3}ms, p95={:.3}ms, {} payloads",
            timings.mean_ms,
            timings.p95_ms,
            sink.payloads
        );

        BenchmarkResult {
            scene_name: scene.name.to_string(),
            decal_count: live.len() as u32,
            viewers: scene.viewers,
            tick_count: self.tick_count,
            payloads_sent: sink.payloads,
            chunks_sent: sink.chunks,
            timings,
        }
    }
}

fn place(
    system: &mut DecalSystem,
    world: &FlatWorld,
    i: u32,
    tick: u32,
    extent: f32,
) -> Option<DecalId> {
    let position = Vec2::new(
        hash_to_range(scatter_hash(i, 2, tick), extent),
        hash_to_range(scatter_hash(i, 3, tick), extent),
    );
    let kind = KINDS[(scatter_hash(i, 4, tick) % KINDS.len() as u32) as usize];
    system
        .store_mut()
        .add_decal(
            world,
            Decal::new(position, kind),
            GridCoordinates::new(STATION, position),
        )
        .ok()
}

/// Compute timing statistics from a list of frame times in milliseconds.
fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_timings() {
        let timings = compute_timings(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(timings.min_ms, 1.0);
        assert_eq!(timings.max_ms, 4.0);
        assert_eq!(timings.median_ms, 2.5);
        assert_eq!(timings.mean_ms, 2.5);
    }

    #[test]
    fn test_compute_timings_empty() {
        let timings = compute_timings(&[]);
        assert_eq!(timings.mean_ms, 0.0);
    }

    #[test]
    fn test_small_scene_sends_payloads() {
        let scene = SceneConfig {
            name: "tiny",
            grid_chunks: 2,
            initial_decals: 50,
            viewers: 2,
            churn_per_tick: 2,
            view_half_extent: 8.0,
        };
        let result = BenchmarkRunner::new(10).run_scene(&scene);
        assert_eq!(result.tick_count, 10);
        assert_eq!(result.decal_count, 50);
        assert!(result.payloads_sent >= 2);
        assert!(result.chunks_sent >= result.payloads_sent);
    }
}
