use crate::algebra::{BasicTrajectoryOps, UniformGeometry};
use crate::matcher::MatchParams;
use crate::projection::ProjectionParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Full volume report (timings, per-seed trace).
    pub report_json: Option<PathBuf>,
    /// Particle-flow objects created by the pass.
    pub pfos_json: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    /// Serialized volume context to match.
    pub input_path: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub match_params: MatchParams,
    #[serde(default)]
    pub projection: ProjectionParams,
    #[serde(default)]
    pub ops: BasicTrajectoryOps,
    #[serde(default)]
    pub geometry: UniformGeometry,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}
