//! Error types for hours-engine operations.

use thiserror::Error;

use crate::schedule::DayCode;

#[derive(Error, Debug)]
pub enum HoursError {
    /// The weekly schedule has no entry for a weekday that had to be resolved.
    #[error("Weekly schedule is missing day: {0}")]
    MissingScheduleDay(DayCode),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Provider data that does not fit the schedule model.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid hours kind: {0}")]
    InvalidHoursKind(String),
}

impl From<serde_json::Error> for HoursError {
    fn from(err: serde_json::Error) -> Self {
        HoursError::MalformedPayload(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HoursError>;
