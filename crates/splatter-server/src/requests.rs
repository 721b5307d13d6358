use serde::{Deserialize, Serialize};
use splatter_core::types::GridCoordinates;
use splatter_core::{Color, Decal};

/// Client request to place a decal. Unset optional fields take decal defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDecalRequest {
    pub kind: String,
    pub coordinates: GridCoordinates,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub rotation: Option<f32>,
    #[serde(default)]
    pub z_index: Option<i32>,
    #[serde(default)]
    pub cleanable: Option<bool>,
}

impl PlaceDecalRequest {
    pub fn new(kind: impl Into<String>, coordinates: GridCoordinates) -> Self {
        Self {
            kind: kind.into(),
            coordinates,
            color: None,
            rotation: None,
            z_index: None,
            cleanable: None,
        }
    }

    pub fn to_decal(&self) -> Decal {
        let base = Decal::new(self.coordinates.position, self.kind.clone());
        Decal {
            color: self.color,
            rotation: self.rotation.unwrap_or(base.rotation),
            z_index: self.z_index.unwrap_or(base.z_index),
            cleanable: self.cleanable.unwrap_or(base.cleanable),
            ..base
        }
    }
}

/// Client request to clear decals around a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemoveDecalRequest {
    pub coordinates: GridCoordinates,
}
