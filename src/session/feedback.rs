use bevy::prelude::*;

use super::input::Hand;
use crate::config::PulseSettings;

/// Fire-and-forget vibration request. Nobody listening is fine.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct HapticPulse {
    pub hand: Hand,
    pub amplitude: f32,
    /// Seconds.
    pub duration: f32,
}

impl HapticPulse {
    pub fn new(hand: Hand, pulse: PulseSettings) -> Self {
        Self { hand, amplitude: pulse.amplitude, duration: pulse.duration }
    }
}
