/// Errors raised while loading decal configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse decal config RON: {0}")]
    ParseError(String),

    #[error("removal_radius must be positive, got {0}")]
    InvalidRemovalRadius(f32),

    #[error("pool_capacity must be at least 1")]
    ZeroPoolCapacity,

    #[error("split_epsilon must be finite and not negative, got {0}")]
    InvalidSplitEpsilon(f32),
}
