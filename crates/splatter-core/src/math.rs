use crate::constants::CHUNK_SIZE;
use crate::types::{ChunkCoord, TileCoord};
use glam::{Affine2, IVec2, Vec2};

/// Convert a grid-local position to its containing chunk coordinate.
pub fn chunk_coord_of(position: Vec2) -> ChunkCoord {
    let cs = CHUNK_SIZE as f32;
    IVec2::new(
        (position.x / cs).floor() as i32,
        (position.y / cs).floor() as i32,
    )
}

/// Convert a grid-local position to the tile it lies on.
pub fn tile_of(position: Vec2) -> TileCoord {
    IVec2::new(position.x.floor() as i32, position.y.floor() as i32)
}

/// Axis-aligned box in 2D. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centred on `center` extending `half_extents` in each direction.
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Bounds of a single tile, widened by `epsilon` on every side.
    pub fn tile(tile: TileCoord, epsilon: f32) -> Self {
        let origin = tile.as_vec2();
        Self::new(
            origin - Vec2::splat(epsilon),
            origin + Vec2::splat(1.0 + epsilon),
        )
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn intersects(&self, other: &Aabb2) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Bounding box of this box after applying `transform` to its corners.
    pub fn transformed(&self, transform: &Affine2) -> Self {
        let corners = [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ];
        let first = transform.transform_point2(corners[0]);
        let (min, max) = corners[1..]
            .iter()
            .map(|c| transform.transform_point2(*c))
            .fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Self { min, max }
    }

    /// All chunk coordinates whose area this box touches, row by row.
    pub fn chunks(&self) -> impl Iterator<Item = ChunkCoord> {
        let lo = chunk_coord_of(self.min);
        let hi = chunk_coord_of(self.max);
        (lo.y..=hi.y).flat_map(move |y| (lo.x..=hi.x).map(move |x| IVec2::new(x, y)))
    }
}
