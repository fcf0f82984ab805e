use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SwitchbackError {
    #[error("Invalid horizon: {0} days (must be at least 1)")]
    InvalidHorizon(u32),

    #[error("Invalid window length: {0} minutes (must be at least 1)")]
    InvalidWindowLength(u32),

    #[error("Invalid uplift factor: {0} (must be finite and at least 1.0)")]
    InvalidUplift(f64),

    #[error("Invalid market parameters: {0}")]
    InvalidMarketParams(String),

    #[error("Empty schedule: horizon of {days} days holds no {window_minutes}-minute window")]
    EmptySchedule { days: u32, window_minutes: u32 },

    #[error("Horizon too large: {windows} windows (at most {max_windows})")]
    HorizonTooLarge { windows: u64, max_windows: u64 },

    #[error("Schedule of {windows} windows from {start} runs past the representable time range")]
    ScheduleOutOfRange { start: DateTime<Utc>, windows: u64 },

    #[error("Demand too large: about {expected_requests} requests expected (at most {max_requests})")]
    DemandTooLarge { expected_requests: u64, max_requests: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SwitchbackError {
    /// True for errors caused by caller-supplied configuration
    pub fn is_config_error(&self) -> bool {
        !matches!(self, SwitchbackError::Internal(_))
    }
}

pub type Result<T> = std::result::Result<T, SwitchbackError>;
