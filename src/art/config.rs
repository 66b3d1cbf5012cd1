use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Fraction of the viewport extent a full-speed entity drifts per nominal frame.
    pub base_movement_factor: f32,
    /// Scale applied to accumulated milliseconds before they enter the oscillation sine.
    pub oscillation_factor: f32,
    /// Pixels per nominal frame at `wobble == 1`.
    pub oscillation_amplitude: f32,
    pub attraction_radius: f32,
    pub attraction_strength: f32,
    /// Below this distance the pull fades linearly so the pointer is a resting point.
    pub arrival_radius: f32,
    /// Velocity multiplier per nominal 60 Hz frame.
    pub damping: f32,
    pub max_speed: f32,
    pub bounce_restitution: f32,
    pub boundary_margin: f32,
    /// Upper bound for the drift heading's turn rate, radians per second.
    pub max_heading_rate: f32,
    pub max_time_scale: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            base_movement_factor: 0.0015,
            oscillation_factor: 0.001,
            oscillation_amplitude: 0.6,
            attraction_radius: 150.0,
            attraction_strength: 0.35,
            arrival_radius: 24.0,
            damping: 0.98,
            max_speed: 6.0,
            bounce_restitution: 0.8,
            boundary_margin: 16.0,
            max_heading_rate: 0.25,
            max_time_scale: 3.0,
        }
    }
}

impl MotionConfig {
    /// A field with no ambient motion, handy when only attraction matters.
    #[cfg(test)]
    pub fn still() -> Self {
        Self {
            base_movement_factor: 0.0,
            oscillation_amplitude: 0.0,
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub selected_scale: f32,
    pub animation_secs: f32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            selected_scale: 2.0,
            animation_secs: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub width: f32,
    pub height: f32,
    pub gap: f32,
    pub viewport_margin: f32,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 80.0,
            gap: 30.0,
            viewport_margin: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtConfig {
    pub seed: u64,
    pub motion: MotionConfig,
    pub selection: SelectionConfig,
    pub tooltip: TooltipConfig,
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_d41f,
            motion: MotionConfig::default(),
            selection: SelectionConfig::default(),
            tooltip: TooltipConfig::default(),
        }
    }
}

impl ArtConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid config JSON in {}", path.display()))
    }
}
