//! Picker tuning parameters

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Thresholds used by the snap picker
///
/// Pixel thresholds are screen-space and converted to world units per hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    /// Hits farther than this from the nearest hit are dropped (world units)
    pub clustering_epsilon: f32,
    /// Maximum number of hover snaps returned by `nearby`
    pub nearby_limit: usize,
    /// Point pick radius for `intersect` (pixels)
    pub points_threshold: f32,
    /// Point pick radius for `nearby` (pixels)
    pub nearby_points_threshold: f32,
    /// Curve, edge and axis pick radius (pixels)
    pub line_threshold: f32,
}

impl PickerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            clustering_epsilon: 1e-2,
            nearby_limit: 21,
            points_threshold: 10.0,
            nearby_points_threshold: 200.0,
            line_threshold: 6.0,
        }
    }
}
