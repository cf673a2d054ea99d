// src/grid/visualizer.rs
//! The visible grid cage around the working area. The session reads it for the
//! near/far visibility zones and for the paint boundary.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::coords::CellCoord;
use super::index::GridIndex;

#[derive(Resource, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridVisualizer {
    /// Cell at the middle of the cage.
    pub center: CellCoord,
    /// Cells on each side of `center` (per axis).
    pub half_range: i32,
}

impl Default for GridVisualizer {
    fn default() -> Self {
        Self { center: CellCoord::ZERO, half_range: 4 }
    }
}

impl GridVisualizer {
    /// Cell lies inside the cage.
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        self.center.chebyshev(cell) <= self.half_range.max(0) as u32
    }

    /// Half-extent of the near cube in world units.
    pub fn near_half_extent(&self, grid: &GridIndex) -> f32 {
        (self.half_range.max(0) as f32 + 0.5) * grid.cell_size()
    }

    pub fn near_contains(&self, grid: &GridIndex, pos: Vec3) -> bool {
        self.cube_contains(grid, pos, self.near_half_extent(grid))
    }

    /// Near cube widened by `scale`.
    pub fn far_contains(&self, grid: &GridIndex, pos: Vec3, scale: f32) -> bool {
        self.cube_contains(grid, pos, self.near_half_extent(grid) * scale)
    }

    fn cube_contains(&self, grid: &GridIndex, pos: Vec3, half: f32) -> bool {
        let d = (pos - grid.cell_to_world(self.center)).abs();
        d.max_element() <= half
    }
}

/// Gizmo cage + hovered cell outline.
pub fn draw_grid_cage(
    mut gizmos: Gizmos,
    grid: Option<Res<GridIndex>>,
    visualizer: Option<Res<GridVisualizer>>,
    session: Option<Res<crate::session::PlacementSession>>,
) {
    let (Some(grid), Some(vis)) = (grid, visualizer) else { return; };

    let size = vis.near_half_extent(&grid) * 2.0;
    gizmos.cuboid(
        Transform::from_translation(grid.cell_to_world(vis.center)).with_scale(Vec3::splat(size)),
        Color::srgba(0.6, 0.7, 0.9, 0.5),
    );

    if let Some(cell) = session.as_deref().and_then(|s| s.snapped_cell()) {
        gizmos.cuboid(
            Transform::from_translation(grid.cell_to_world(cell))
                .with_scale(Vec3::splat(grid.cell_size())),
            Color::srgb(1.0, 1.0, 1.0),
        );
    }
}
