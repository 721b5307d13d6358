use serde::{Deserialize, Serialize};
use splatter_core::constants::{DEFAULT_POOL_CAPACITY, DEFAULT_REMOVAL_RADIUS, SPLIT_BOUNDS_EPSILON};

use crate::error::ConfigError;

/// Tunables for the decal system, read from RON. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecalConfig {
    /// Radius of client "remove decals near point" requests.
    pub removal_radius: f32,
    /// Idle scratch collections kept between sync ticks.
    pub pool_capacity: usize,
    /// Slack added around tile bounds when transferring decals on grid split.
    pub split_epsilon: f32,
}

impl Default for DecalConfig {
    fn default() -> Self {
        Self {
            removal_radius: DEFAULT_REMOVAL_RADIUS,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            split_epsilon: SPLIT_BOUNDS_EPSILON,
        }
    }
}

impl DecalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.removal_radius.is_nan() || self.removal_radius <= 0.0 {
            return Err(ConfigError::InvalidRemovalRadius(self.removal_radius));
        }
        if self.pool_capacity == 0 {
            return Err(ConfigError::ZeroPoolCapacity);
        }
        if !self.split_epsilon.is_finite() || self.split_epsilon < 0.0 {
            return Err(ConfigError::InvalidSplitEpsilon(self.split_epsilon));
        }
        Ok(())
    }
}

/// Parse and validate a decal config from a RON string.
pub fn load_config_from_str(ron_str: &str) -> Result<DecalConfig, ConfigError> {
    let options = ron::Options::default();
    let config: DecalConfig = options
        .from_str(ron_str)
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
