// src/session/input.rs
//! Polled session input: a command queue drained once per tick plus the
//! current stick value of each hand.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    #[default]
    Right,
}

impl Hand {
    pub fn other(self) -> Self {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }
}

/// Tracked controller pose. Its `Transform` is the hand pose; forward is -Z.
#[derive(Component, Clone, Copy, Debug)]
pub struct Controller {
    pub hand: Hand,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementCommand {
    Grab { entity: Entity, hand: Hand },
    Release,
    Place,
    StartPaint,
    StopPaint,
    Cancel,
}

#[derive(Resource, Default, Debug)]
pub struct PlacementInput {
    queue: Vec<PlacementCommand>,
    left_axis: Vec2,
    right_axis: Vec2,
}

impl PlacementInput {
    pub fn push(&mut self, command: PlacementCommand) {
        self.queue.push(command);
    }

    pub fn pending(&self) -> &[PlacementCommand] { &self.queue }

    /// Take every queued command in arrival order.
    pub fn drain(&mut self) -> Vec<PlacementCommand> {
        std::mem::take(&mut self.queue)
    }

    pub fn set_axis(&mut self, hand: Hand, value: Vec2) {
        match hand {
            Hand::Left => self.left_axis = value,
            Hand::Right => self.right_axis = value,
        }
    }

    pub fn axis(&self, hand: Hand) -> Vec2 {
        match hand {
            Hand::Left => self.left_axis,
            Hand::Right => self.right_axis,
        }
    }
}
