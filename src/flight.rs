use crate::aircraft::Registration;
use crate::instructor::InstructorName;
use crate::time::{Time, TimeRange};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type FlightId = Arc<str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightType {
    Dual,
    Solo,
    Checkride,
    Spin,
    Photo,
    Meeting,
    Maintenance,
    Ground,
}

impl fmt::Display for FlightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlightType::Dual => "dual",
            FlightType::Solo => "solo",
            FlightType::Checkride => "checkride",
            FlightType::Spin => "spin",
            FlightType::Photo => "photo",
            FlightType::Meeting => "meeting",
            FlightType::Maintenance => "maintenance",
            FlightType::Ground => "ground",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for FlightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
            .map_err(|_| format!("unknown flight type \"{}\"", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightStatus::Scheduled => write!(f, "scheduled"),
            FlightStatus::Completed => write!(f, "completed"),
            FlightStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Display grouping only; never consulted by availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlightCategory {
    Standard,
    Unavailable,
    SpinTraining,
    PhotoFlight,
    NewStudent,
    Meeting,
    Maintenance,
    InOffice,
    H6Operations,
    Groundschool,
    GroundInstruction,
    AircraftCheckout,
    DownTime,
    CheckrideCategory,
    Bfr,
}

impl fmt::Display for FlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(s)) => write!(f, "{}", s),
            _ => write!(f, "{:?}", self),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: FlightId,
    pub date: NaiveDate,
    pub start_time: Time,
    pub end_time: Time,
    pub aircraft: Registration,
    pub instructor: InstructorName,
    pub student: String,
    #[serde(rename = "type")]
    pub kind: FlightType,
    pub status: FlightStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobbs_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_category: Option<FlightCategory>,
}

impl Flight {
    /// The interval this flight occupies its resources for.
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Whether the flight still holds its aircraft and instructor.
    pub fn is_active(&self) -> bool {
        self.status != FlightStatus::Cancelled
    }

    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date == date
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}-{} {} with {}",
            self.id, self.date, self.start_time, self.end_time, self.aircraft, self.instructor
        )
    }
}
