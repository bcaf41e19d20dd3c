use crate::types::{HitId, PlaneId, TrajId, VertexId};
use nalgebra::Vector3;
use serde::{Deserialize, Deserializer, Serialize};

/// Single-plane, single-time signal.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Hit {
    /// Trajectory currently owning the hit, if any. Zero or negative
    /// owners read as unowned.
    #[serde(default, deserialize_with = "owner_or_unowned")]
    pub owner: Option<TrajId>,
    #[serde(default)]
    pub peak_time: f32,
    #[serde(default)]
    pub rms: f32,
}

fn owner_or_unowned<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<TrajId>, D::Error> {
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(TrajId::new))
}

impl Hit {
    pub fn owned_by(owner: TrajId) -> Self {
        Self {
            owner: Some(owner),
            ..Default::default()
        }
    }
}

/// 3D point formed by coincident hits on two or more planes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpacePoint {
    pub pos: Vector3<f32>,
    pub hits: Vec<HitId>,
}

/// 2D vertex joining trajectory ends in one plane.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vertex2d {
    pub id: VertexId,
    pub plane: PlaneId,
    pub pos: [f32; 2],
    #[serde(default)]
    pub obsolete: bool,
}
