use crate::math::tile_of;
use crate::types::TileCoord;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Linear RGBA color override (0.0–1.0 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// A cosmetic overlay stored on a grid.
///
/// Decals are values: a stored decal is never edited in place. Every change
/// goes through one of the `with_*` functions, which return an updated copy
/// that replaces the stored one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decal {
    /// Grid-local position of the decal's bottom-left corner.
    pub position: Vec2,
    /// Catalog identifier ("blood", "scorch", ...).
    pub kind: String,
    /// Optional tint. `None` renders with the catalog color.
    pub color: Option<Color>,
    /// Rotation in radians.
    pub rotation: f32,
    /// Draw order; higher draws on top.
    pub z_index: i32,
    /// Whether janitorial tools may remove this decal.
    pub cleanable: bool,
}

impl Decal {
    pub fn new(position: Vec2, kind: impl Into<String>) -> Self {
        Self {
            position,
            kind: kind.into(),
            color: None,
            rotation: 0.0,
            z_index: 0,
            cleanable: false,
        }
    }

    pub fn with_position(&self, position: Vec2) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    pub fn with_kind(&self, kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..self.clone()
        }
    }

    pub fn with_color(&self, color: Option<Color>) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    pub fn with_rotation(&self, rotation: f32) -> Self {
        Self {
            rotation,
            ..self.clone()
        }
    }

    pub fn with_z_index(&self, z_index: i32) -> Self {
        Self {
            z_index,
            ..self.clone()
        }
    }

    pub fn with_cleanable(&self, cleanable: bool) -> Self {
        Self {
            cleanable,
            ..self.clone()
        }
    }

    /// Tile the decal's anchor point falls on.
    pub fn tile(&self) -> TileCoord {
        tile_of(self.position)
    }
}
