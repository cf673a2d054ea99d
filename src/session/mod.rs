//! Interactive placement: grab, rotate, dolly, place, paint-stamp, cancel.

mod feedback;
mod input;
mod paint;
mod plugin;
mod repeat;
mod state;
pub mod systems;

pub use feedback::HapticPulse;
pub use input::{Controller, Hand, PlacementCommand, PlacementInput};
pub use paint::{PaintPath, PathStep};
pub use plugin::{PlacementPlugin, PlacementSet};
pub use repeat::{AxisRepeat, RotateAxis, RotateStep};
pub use state::{Held, HeldObject, PlacementSession, SessionPhase, ZoneChange};
