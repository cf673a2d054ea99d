// src/session/state.rs
//! Session state: what is held, how it is oriented, and the paint gesture.

use bevy::prelude::*;

use super::input::Hand;
use super::paint::{PaintPath, PathStep};
use super::repeat::{AxisRepeat, RotateAxis, RotateStep};
use crate::config::PlacementTuning;
use crate::grid::{CellCoord, GridIndex};
use crate::prefab::Placeable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Idle,
    Holding,
    Painting,
}

/// Marker on the object currently in hand.
#[derive(Component, Clone, Copy, Debug)]
pub struct Held {
    pub hand: Hand,
}

#[derive(Clone, Debug)]
pub struct HeldObject {
    pub entity: Entity,
    pub hand: Hand,
    pub placeable: Placeable,
    /// Renderer parts cached at grab time.
    pub renderers: Vec<Entity>,
}

/// Boundary crossings of the visibility hysteresis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneChange {
    EnteredNear,
    ExitedFar,
}

#[derive(Resource, Debug, Default)]
pub struct PlacementSession {
    held: Option<HeldObject>,
    /// Accumulated, unquantized (degrees).
    yaw: f32,
    pitch: f32,
    painting: bool,
    path: PaintPath,
    locked_rotation: Quat,
    snapped_cell: Option<CellCoord>,
    last_sample: Option<Vec3>,
    preview_dirty: bool,
    mesh_hidden: bool,
    reach: f32,
    rotate_repeat: AxisRepeat,
}

impl PlacementSession {
    pub fn phase(&self) -> SessionPhase {
        match (&self.held, self.painting) {
            (None, _) => SessionPhase::Idle,
            (Some(_), false) => SessionPhase::Holding,
            (Some(_), true) => SessionPhase::Painting,
        }
    }

    pub fn is_active(&self) -> bool { self.held.is_some() }

    pub fn held(&self) -> Option<&HeldObject> { self.held.as_ref() }

    pub fn held_entity(&self) -> Option<Entity> { self.held.as_ref().map(|h| h.entity) }

    /// Cell under the held object at the last preview update.
    pub fn snapped_cell(&self) -> Option<CellCoord> { self.snapped_cell }

    pub fn path(&self) -> &PaintPath { &self.path }

    pub fn yaw_pitch(&self) -> (f32, f32) { (self.yaw, self.pitch) }

    pub fn reach(&self) -> f32 { self.reach }

    pub fn set_reach(&mut self, reach: f32) { self.reach = reach; }

    pub fn is_mesh_hidden(&self) -> bool { self.mesh_hidden }

    pub fn live_rotation(&self, grid: &GridIndex) -> Quat {
        grid.quantize_yaw_pitch(self.yaw, self.pitch)
    }

    /// Orientation captured when painting started.
    pub fn locked_rotation(&self) -> Quat { self.locked_rotation }

    /// Enter `Holding`. Yaw and pitch are seeded from `rotation` (roll is dropped).
    pub fn begin_hold(&mut self, held: HeldObject, rotation: Quat, reach: f32) {
        let (yaw, pitch, _roll) = rotation.to_euler(EulerRot::YXZ);
        *self = Self {
            held: Some(held),
            yaw: yaw.to_degrees(),
            pitch: pitch.to_degrees(),
            reach,
            preview_dirty: true,
            ..default()
        };
    }

    /// Back to `Idle`; hands the held object to the caller.
    pub fn end_hold(&mut self) -> Option<HeldObject> {
        let held = self.held.take();
        *self = Self::default();
        held
    }

    /// Lock the live orientation and start a fresh path. False unless `Holding`.
    pub fn start_paint(&mut self, grid: &GridIndex) -> bool {
        if self.phase() != SessionPhase::Holding {
            return false;
        }
        self.painting = true;
        self.locked_rotation = self.live_rotation(grid);
        self.path.clear();
        self.preview_dirty = true;
        true
    }

    pub fn paint_step(&mut self, cell: CellCoord) -> PathStep {
        if !self.painting {
            return PathStep::Ignored;
        }
        self.path.step(cell)
    }

    pub fn tick_rotate_repeat(&mut self, input: Vec2, dt: f32, tuning: &PlacementTuning) -> Option<RotateStep> {
        self.rotate_repeat.tick(input, dt, tuning)
    }

    pub fn apply_rotation_step(&mut self, step: RotateStep, rotation_step: f32) {
        let delta = step.direction as f32 * rotation_step;
        match step.axis {
            RotateAxis::Yaw => self.yaw += delta,
            RotateAxis::Pitch => self.pitch += delta,
        }
        self.preview_dirty = true;
    }

    pub fn set_snapped_cell(&mut self, cell: CellCoord) { self.snapped_cell = Some(cell); }

    pub fn mark_preview_dirty(&mut self) { self.preview_dirty = true; }

    /// Returns and clears the dirty flag.
    pub fn take_preview_dirty(&mut self) -> bool {
        std::mem::take(&mut self.preview_dirty)
    }

    /// Record `pos` if it moved more than `epsilon_sq` from the last recorded sample.
    pub fn take_sample(&mut self, pos: Vec3, epsilon_sq: f32) -> bool {
        match self.last_sample {
            Some(last) if last.distance_squared(pos) <= epsilon_sq => false,
            _ => {
                self.last_sample = Some(pos);
                true
            }
        }
    }

    /// Hysteresis: hide on entering the near zone, show again only past the far zone.
    pub fn update_zone(&mut self, in_near: bool, in_far: bool) -> Option<ZoneChange> {
        if !self.mesh_hidden && in_near {
            self.mesh_hidden = true;
            self.preview_dirty = true;
            Some(ZoneChange::EnteredNear)
        } else if self.mesh_hidden && !in_far {
            self.mesh_hidden = false;
            Some(ZoneChange::ExitedFar)
        } else {
            None
        }
    }
}
