use splatter_core::constants::CHUNK_SIZE;

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    /// Side length of the square station grid, in chunks.
    pub grid_chunks: u32,
    pub initial_decals: u32,
    pub viewers: u32,
    /// Decals added and removed every tick.
    pub churn_per_tick: u32,
    /// Half extent of each viewer's view bounds, in tiles.
    pub view_half_extent: f32,
}

impl SceneConfig {
    /// Side length of the grid in tiles.
    pub fn grid_tiles(&self) -> u32 {
        self.grid_chunks * CHUNK_SIZE
    }
}

/// Return the standard suite of benchmark scenes, from a quiet shift to a
/// crowded round.
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "quiet",
            grid_chunks: 4,
            initial_decals: 500,
            viewers: 8,
            churn_per_tick: 4,
            view_half_extent: 12.0,
        },
        SceneConfig {
            name: "busy",
            grid_chunks: 8,
            initial_decals: 5_000,
            viewers: 40,
            churn_per_tick: 32,
            view_half_extent: 16.0,
        },
        SceneConfig {
            name: "crowded",
            grid_chunks: 12,
            initial_decals: 20_000,
            viewers: 100,
            churn_per_tick: 128,
            view_half_extent: 16.0,
        },
        SceneConfig {
            name: "messy",
            grid_chunks: 16,
            initial_decals: 60_000,
            viewers: 120,
            churn_per_tick: 512,
            view_half_extent: 20.0,
        },
    ]
}

/// Deterministic integer hash used to scatter decals and walk viewers.
pub fn scatter_hash(a: u32, b: u32, tick: u32) -> u32 {
    let mut state = a
        .wrapping_mul(0x9E3779B9)
        .wrapping_add(b.wrapping_mul(0x517CC1B7))
        .wrapping_add(tick.wrapping_mul(0x2545F491));

    state ^= state >> 16;
    state = state.wrapping_mul(0x45D9F3B);
    state ^= state >> 16;
    state = state.wrapping_mul(0x45D9F3B);
    state ^= state >> 16;

    state
}

/// Map a hash onto `0.0..extent`, never reaching `extent`.
pub fn hash_to_range(hash: u32, extent: f32) -> f32 {
    (hash >> 8) as f32 / (1u32 << 24) as f32 * extent
}
