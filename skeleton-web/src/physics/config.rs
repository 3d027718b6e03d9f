//! Smoother configuration

use serde::{Deserialize, Serialize};

/// Global scale factors of a `JointSmoother`
///
/// Non-positive values are dropped when applied, leaving the previous value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmootherConfig {
    /// Spring strength multiplier - lower = smoother, slower easing
    pub smooth_scale: f32,
    /// Multiplier applied to every projected screen coordinate
    pub position_scale: f32,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            smooth_scale: 1.0,
            position_scale: 1.0,
        }
    }
}

impl SmootherConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// `self` with every field the patch supplies overridden
    pub fn merged(self, patch: ConfigPatch) -> Self {
        Self {
            smooth_scale: patch.smooth_scale.unwrap_or(self.smooth_scale),
            position_scale: patch.position_scale.unwrap_or(self.position_scale),
        }
    }
}

/// Partial config update - absent fields keep their current value
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigPatch {
    pub smooth_scale: Option<f32>,
    pub position_scale: Option<f32>,
}

impl ConfigPatch {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
