// src/session/repeat.rs
//! Key-repeat curve for the rotate stick.

use bevy::prelude::*;

use crate::config::PlacementTuning;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotateAxis {
    Yaw,
    Pitch,
}

/// One accepted rotation step; `direction` is +1 or -1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotateStep {
    pub axis: RotateAxis,
    pub direction: i8,
}

#[derive(Clone, Debug, Default)]
pub struct AxisRepeat {
    held: Option<RotateStep>,
    /// Seconds until the next repeat while `held` stays the same.
    countdown: f32,
}

impl AxisRepeat {
    pub fn reset(&mut self) {
        self.held = None;
        self.countdown = 0.0;
    }

    /// Feed one tick of stick input. Steps immediately on a new deflection,
    /// then after `rotate_first_delay`, then every `rotate_repeat_interval`.
    pub fn tick(&mut self, input: Vec2, dt: f32, tuning: &PlacementTuning) -> Option<RotateStep> {
        let Some(step) = dominant_step(input, tuning.rotate_deadzone) else {
            self.reset();
            return None;
        };

        if self.held != Some(step) {
            self.held = Some(step);
            self.countdown = tuning.rotate_first_delay;
            return Some(step);
        }

        self.countdown -= dt;
        if self.countdown <= 0.0 {
            self.countdown += tuning.rotate_repeat_interval;
            return Some(step);
        }
        None
    }
}

/// Larger magnitude wins; yaw is checked first so ties go to yaw.
fn dominant_step(input: Vec2, deadzone: f32) -> Option<RotateStep> {
    let (x, y) = (input.x.abs(), input.y.abs());
    let sign = |v: f32| if v > 0.0 { 1 } else { -1 };
    if x > deadzone && x >= y {
        Some(RotateStep { axis: RotateAxis::Yaw, direction: sign(input.x) })
    } else if y > deadzone {
        Some(RotateStep { axis: RotateAxis::Pitch, direction: sign(input.y) })
    } else {
        None
    }
}
