use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;

/// Tail number; the canonical key of an aircraft in flight records.
pub type Registration = Arc<str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AircraftStatus {
    Available,
    Maintenance,
    Unavailable,
}

impl fmt::Display for AircraftStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AircraftStatus::Available => write!(f, "available"),
            AircraftStatus::Maintenance => write!(f, "maintenance"),
            AircraftStatus::Unavailable => write!(f, "unavailable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: Arc<str>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub registration: Registration,
    pub status: AircraftStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobbs_time: Option<f64>,
}

impl Aircraft {
    pub fn is_bookable(&self) -> bool {
        self.status == AircraftStatus::Available
    }
}

impl fmt::Display for Aircraft {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} • {}", self.registration, self.kind)
    }
}
