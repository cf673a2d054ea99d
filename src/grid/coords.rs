// src/grid/coords.rs
//! Cell addressing and the immutable grid configuration.

use bevy::prelude::*; // IVec3, Vec3
use serde::{Deserialize, Serialize};

/// Integer address of one grid cube. Matches the occupancy table key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellCoord {
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self { Self { x, y, z } }

    pub fn as_ivec3(self) -> IVec3 { IVec3::new(self.x, self.y, self.z) }

    /// Sum of per-axis distances.
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }

    /// Largest per-axis distance.
    pub fn chebyshev(self, other: Self) -> u32 {
        self.x
            .abs_diff(other.x)
            .max(self.y.abs_diff(other.y))
            .max(self.z.abs_diff(other.z))
    }

    /// True when exactly one axis differs, by exactly one cell.
    #[inline]
    pub fn is_face_adjacent(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<IVec3> for CellCoord {
    fn from(v: IVec3) -> Self { Self::new(v.x, v.y, v.z) }
}

/// Grid layout; fixed for the lifetime of a `GridIndex`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Edge length of one cell (world units, > 0).
    pub cell_size: f32,
    /// World-space offset subtracted before cell conversion.
    pub origin: Vec3,
    /// Rotation quantum in degrees (> 0).
    pub rotation_step: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { cell_size: 1.0, origin: Vec3::ZERO, rotation_step: 90.0 }
    }
}

impl GridConfig {
    pub fn is_valid(&self) -> bool {
        self.cell_size.is_finite()
            && self.cell_size > 0.0
            && self.rotation_step.is_finite()
            && self.rotation_step > 0.0
            && self.origin.is_finite()
    }
}
