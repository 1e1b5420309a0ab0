use crate::booking::Rejection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("scenario file could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed time \"{0}\", expected HH:MM")]
    MalformedTime(String),

    #[error("invalid interval {start}-{end}, start must be before end")]
    InvalidInterval { start: String, end: String },

    #[error("invalid time grid: {0}")]
    GridConfig(String),

    #[error("inconsistent catalog: {0}")]
    Catalog(String),

    #[error("unknown aircraft {0}")]
    UnknownAircraft(String),

    #[error("unknown instructor {0}")]
    UnknownInstructor(String),

    #[error("unknown flight {0}")]
    UnknownFlight(String),

    #[error("flight {0} is already cancelled")]
    AlreadyCancelled(String),

    #[error("invalid hobbs time {0}")]
    InvalidHobbs(f64),

    #[error("a cancellation reason is required")]
    MissingCancelReason,

    #[error("{event} is not allowed while {state}")]
    InvalidTransition { state: String, event: String },

    #[error("booking rejected: {0}")]
    Rejected(#[from] Rejection),
}

pub type Result<T> = std::result::Result<T, Error>;
