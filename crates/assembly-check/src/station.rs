use serde::{Deserialize, Serialize};
use solid_kernel::SolidHandle;

use crate::pairwise::NamedPart;

/// Positioned solids of one tuner station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationHandles {
    pub wheel: SolidHandle,
    /// Peg head with its integral worm.
    pub peg_head: SolidHandle,
    pub string_post: SolidHandle,
}

/// A positioned gang: one frame holding any number of stations.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyHandles {
    pub frame: SolidHandle,
    pub stations: Vec<StationHandles>,
}

impl AssemblyHandles {
    pub fn new(frame: SolidHandle) -> Self {
        Self {
            frame,
            stations: Vec::new(),
        }
    }

    pub fn with_station(mut self, station: StationHandles) -> Self {
        self.stations.push(station);
        self
    }

    /// Every solid under a part name (`frame`, `wheel_1`, `peg_head_1`, ...),
    /// stations numbered from 1.
    pub fn named_parts(&self) -> Vec<NamedPart> {
        let mut parts = vec![NamedPart::new("frame", self.frame.clone())];
        for (i, s) in self.stations.iter().enumerate() {
            let n = i + 1;
            parts.push(NamedPart::new(format!("wheel_{n}"), s.wheel.clone()));
            parts.push(NamedPart::new(format!("peg_head_{n}"), s.peg_head.clone()));
            parts.push(NamedPart::new(format!("string_post_{n}"), s.string_post.clone()));
        }
        parts
    }
}

/// The fixed per-station interference checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Wheel against the peg head's worm.
    GearMesh,
    /// String post against the frame.
    PostInHole,
    /// Peg head against the frame.
    WormInHole,
    /// Wheel against the frame.
    WheelInCavity,
}

impl CheckKind {
    pub const ALL: [CheckKind; 4] = [
        CheckKind::GearMesh,
        CheckKind::PostInHole,
        CheckKind::WormInHole,
        CheckKind::WheelInCavity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CheckKind::GearMesh => "gear_mesh",
            CheckKind::PostInHole => "post_in_hole",
            CheckKind::WormInHole => "worm_in_hole",
            CheckKind::WheelInCavity => "wheel_in_cavity",
        }
    }

    /// The two solids this check intersects.
    pub fn operands<'a>(
        self,
        frame: &'a SolidHandle,
        station: &'a StationHandles,
    ) -> (&'a SolidHandle, &'a SolidHandle) {
        match self {
            CheckKind::GearMesh => (&station.wheel, &station.peg_head),
            CheckKind::PostInHole => (&station.string_post, frame),
            CheckKind::WormInHole => (&station.peg_head, frame),
            CheckKind::WheelInCavity => (&station.wheel, frame),
        }
    }

    /// Breakdown key, e.g. `tuner_2_gear_mesh` for the second station.
    pub fn key(self, station_number: usize) -> String {
        format!("tuner_{station_number}_{}", self.name())
    }
}
