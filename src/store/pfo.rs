use crate::types::{PfoId, TrajId, VolumeId};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Particle code reserved for shower-like particle-flow objects.
pub const SHOWER_PDG: i32 = 1111;
/// Particle code of an electromagnetic (electron-like) trajectory.
pub const ELECTRON_PDG: i32 = 11;

/// Candidate 3D particle built from at most one trajectory per plane.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pfo {
    pub id: PfoId,
    pub pdg_code: i32,
    pub tj_ids: Vec<TrajId>,
    /// 3D end positions; zero until resolved.
    pub xyz: [Vector3<f32>; 2],
    pub volume: VolumeId,
}

impl Pfo {
    pub fn new(id: PfoId, volume: VolumeId) -> Self {
        Self {
            id,
            pdg_code: 0,
            tj_ids: Vec::new(),
            xyz: [Vector3::zeros(), Vector3::zeros()],
            volume,
        }
    }

    pub fn is_shower(&self) -> bool {
        self.pdg_code == SHOWER_PDG
    }
}
