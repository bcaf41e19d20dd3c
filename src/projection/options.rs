use serde::{Deserialize, Serialize};

/// Parameters of the per-point projection index.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionParams {
    /// Floor on the half-width of the along-drift interval (cm).
    pub min_half_width: f32,
    /// WSE units per TDC tick for the drift-time coordinate of points.
    pub units_per_tick: f32,
    /// Clear the "already 3D-matched" tag of every indexed trajectory.
    pub reset_match_flags: bool,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            min_half_width: 0.1,
            units_per_tick: 1.0,
            reset_match_flags: true,
        }
    }
}
