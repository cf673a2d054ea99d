use bevy::prelude::*;
use std::collections::HashMap;

/// Held-key actions of the desktop harness. One-shot session commands are read
/// straight from `just_pressed` in `input.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorAction {
    HandForward,
    HandBackward,
    HandLeft,
    HandRight,
    HandUp,
    HandDown,
    RotateLeft,
    RotateRight,
    RotateUp,
    RotateDown,
    DollyOut,
    DollyIn,
}

#[derive(Default, Resource)]
pub struct ActionState {
    pressed: HashMap<EditorAction, bool>,
}

impl ActionState {
    pub fn set(&mut self, action: EditorAction, is_pressed: bool) {
        self.pressed.insert(action, is_pressed);
    }

    pub fn pressed(&self, action: EditorAction) -> bool {
        *self.pressed.get(&action).unwrap_or(&false)
    }

    /// -1, 0 or 1 from a pair of opposing actions.
    pub fn axis(&self, negative: EditorAction, positive: EditorAction) -> f32 {
        self.pressed(positive) as i32 as f32 - self.pressed(negative) as i32 as f32
    }
}
