// src/grid/index.rs
//! Occupancy table + coordinate/rotation math for the placement grid.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use super::coords::{CellCoord, GridConfig};

/// The single grid of an editing session. Inserted explicitly (see `EditorStackPlugin`);
/// systems that need it take `Option<Res<GridIndex>>` and idle when it is absent.
#[derive(Resource, Debug, Clone)]
pub struct GridIndex {
    config: GridConfig,
    /// At most one occupant per cell.
    cells: HashMap<CellCoord, Entity>,
}

impl Default for GridIndex {
    fn default() -> Self { Self::new(GridConfig::default()) }
}

impl GridIndex {
    pub fn new(config: GridConfig) -> Self {
        Self { config, cells: HashMap::new() }
    }

    pub fn config(&self) -> &GridConfig { &self.config }

    pub fn cell_size(&self) -> f32 { self.config.cell_size }

    // ---------- coordinates ----------

    pub fn world_to_cell(&self, pos: Vec3) -> CellCoord {
        let local = (pos - self.config.origin) / self.config.cell_size;
        CellCoord::from(local.floor().as_ivec3())
    }

    /// Center of the cube; every snapped placement sits exactly mid-cell.
    pub fn cell_to_world(&self, cell: CellCoord) -> Vec3 {
        self.config.origin + (cell.as_ivec3().as_vec3() + Vec3::splat(0.5)) * self.config.cell_size
    }

    pub fn closest_grid_point(&self, pos: Vec3) -> Vec3 {
        self.cell_to_world(self.world_to_cell(pos))
    }

    // ---------- rotation ----------

    /// Round degrees to the nearest multiple of the rotation step.
    pub fn quantize_angle(&self, degrees: f32) -> f32 {
        let step = self.config.rotation_step;
        (degrees / step).round() * step
    }

    /// Quantize each angle independently (degrees), then compose yaw (Y), pitch (X), roll (Z).
    pub fn quantize_rotation(&self, yaw: f32, pitch: f32, roll: f32) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.quantize_angle(yaw).to_radians(),
            self.quantize_angle(pitch).to_radians(),
            self.quantize_angle(roll).to_radians(),
        )
    }

    pub fn quantize_yaw_pitch(&self, yaw: f32, pitch: f32) -> Quat {
        self.quantize_rotation(yaw, pitch, 0.0)
    }

    pub fn quantize_yaw(&self, yaw: f32) -> Quat {
        self.quantize_rotation(yaw, 0.0, 0.0)
    }

    // ---------- occupancy ----------

    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Same as `is_occupied`, but `ignore` counts as absent (a dragged object never blocks itself).
    pub fn is_occupied_ignoring(&self, cell: CellCoord, ignore: Entity) -> bool {
        matches!(self.cells.get(&cell), Some(&e) if e != ignore)
    }

    pub fn occupant_at(&self, cell: CellCoord) -> Option<Entity> {
        self.cells.get(&cell).copied()
    }

    /// Claim a free cell. An occupied cell keeps its first occupant; returns whether the claim happened.
    pub fn occupy(&mut self, cell: CellCoord, occupant: Entity) -> bool {
        if let Some(&existing) = self.cells.get(&cell) {
            debug!(
                "Grid: cell {:?} already held by {:?}; ignoring claim from {:?}",
                cell, existing, occupant
            );
            return false;
        }
        self.cells.insert(cell, occupant);
        true
    }

    /// Drop every entry that references `occupant`. Returns how many were removed.
    pub fn clear_occupant(&mut self, occupant: Entity) -> usize {
        let before = self.cells.len();
        self.cells.retain(|_, e| *e != occupant);
        before - self.cells.len()
    }

    /// Distinct occupants across all cells (deduplicated even if an occupant spans cells).
    pub fn unique_occupants(&self) -> HashSet<Entity> {
        self.cells.values().copied().collect()
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = (CellCoord, Entity)> + '_ {
        self.cells.iter().map(|(c, e)| (*c, *e))
    }

    pub fn len(&self) -> usize { self.cells.len() }

    pub fn is_empty(&self) -> bool { self.cells.is_empty() }
}
