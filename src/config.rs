// src/config.rs
//! Editor configuration (RON). Every field has a default, so partial files load.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::grid::{GridConfig, GridVisualizer};

/// Amplitude (0..1) and duration (seconds) of one haptic pulse.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PulseSettings {
    pub amplitude: f32,
    pub duration: f32,
}

impl PulseSettings {
    pub const fn new(amplitude: f32, duration: f32) -> Self { Self { amplitude, duration } }
}

/// Feel of the interactive session.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementTuning {
    /// Per-axis magnitude below which the rotate stick is ignored.
    pub rotate_deadzone: f32,
    /// Delay before the first repeat while the stick stays deflected (s).
    pub rotate_first_delay: f32,
    /// Interval between further repeats (s).
    pub rotate_repeat_interval: f32,
    /// Secondary stick deadzone for the dolly.
    pub dolly_deadzone: f32,
    /// Reach change per second once the stick leaves the deadzone (m/s).
    pub dolly_speed: f32,
    pub min_reach: f32,
    pub max_reach: f32,
    /// Reach used when no controller pose is known at grab time.
    pub default_reach: f32,
    /// Far zone size relative to the near zone.
    pub far_zone_scale: f32,
    /// Squared distance the held object must move before the preview is recomputed.
    pub move_epsilon_sq: f32,
    pub rotate_pulse: PulseSettings,
    pub place_pulse: PulseSettings,
    pub stamp_pulse: PulseSettings,
}

impl Default for PlacementTuning {
    fn default() -> Self {
        Self {
            rotate_deadzone: 0.3,
            rotate_first_delay: 0.35,
            rotate_repeat_interval: 0.12,
            dolly_deadzone: 0.1,
            dolly_speed: 1.5,
            min_reach: 0.15,
            max_reach: 3.0,
            default_reach: 0.5,
            far_zone_scale: 1.1,
            move_epsilon_sq: 1e-6,
            rotate_pulse: PulseSettings::new(0.15, 0.02),
            place_pulse: PulseSettings::new(0.35, 0.05),
            stamp_pulse: PulseSettings::new(0.6, 0.1),
        }
    }
}

impl PlacementTuning {
    pub fn clamp_reach(&self, reach: f32) -> f32 {
        reach.clamp(self.min_reach, self.max_reach)
    }
}

/// Settings for the demo level restored at startup.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    pub seed: u64,
    /// How many objects are scattered into the grid through the restore path.
    pub restored_count: usize,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self { seed: 1337, restored_count: 6 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub grid: GridConfig,
    pub placement: PlacementTuning,
    pub visualizer: GridVisualizer,
    /// Asset path of the prefab manifest.
    pub prefabs_path: String,
    pub demo: DemoSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            placement: PlacementTuning::default(),
            visualizer: GridVisualizer::default(),
            prefabs_path: "prefabs/blocks.prefabs.ron".to_string(),
            demo: DemoSettings::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|e| ConfigError::Ron(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron(&text)
    }

    /// Load, or fall back to defaults with a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                info!("Config: loaded '{}'", path.display());
                config
            }
            Err(err) => {
                warn!("Config: {} ('{}'); using defaults", err, path.display());
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.grid.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "grid needs positive cell_size and rotation_step, got {:?}",
                self.grid
            )));
        }
        if self.visualizer.half_range < 0 {
            return Err(ConfigError::Invalid(format!(
                "visualizer half_range {} must be >= 0",
                self.visualizer.half_range
            )));
        }
        let p = &self.placement;
        if !(p.min_reach > 0.0 && p.min_reach <= p.max_reach) {
            return Err(ConfigError::Invalid(format!(
                "reach range [{}, {}] is empty",
                p.min_reach, p.max_reach
            )));
        }
        if p.far_zone_scale < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "far_zone_scale {} must be >= 1.0",
                p.far_zone_scale
            )));
        }
        if p.rotate_repeat_interval <= 0.0 {
            return Err(ConfigError::Invalid("rotate_repeat_interval must be positive".into()));
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("I/O while reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = EditorConfig::from_ron("(grid: (cell_size: 0.5), demo: (seed: 9))")
            .expect("partial config parses");
        assert_eq!(config.grid.cell_size, 0.5);
        assert_eq!(config.grid.rotation_step, 90.0);
        assert_eq!(config.demo.seed, 9);
        assert_eq!(config.placement, PlacementTuning::default());
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = EditorConfig::from_ron(include_str!("../assets/config/editor.ron"))
            .expect("shipped config parses");
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn rejects_non_positive_grid() {
        let err = EditorConfig::from_ron("(grid: (cell_size: 0.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_inverted_reach() {
        let err = EditorConfig::from_ron("(placement: (min_reach: 2.0, max_reach: 1.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_negative_cage() {
        let err = EditorConfig::from_ron("(visualizer: (half_range: -1))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(EditorConfig::from_ron("(visualizer: (half_range: 0))").is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EditorConfig::load("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn reach_is_clamped() {
        let t = PlacementTuning::default();
        assert_eq!(t.clamp_reach(10.0), t.max_reach);
        assert_eq!(t.clamp_reach(0.0), t.min_reach);
    }
}
