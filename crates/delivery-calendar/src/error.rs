//! Error types for delivery-calendar operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The business window or holiday set cannot produce working time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A range whose start lies after its end.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// A rejected input value (negative or non-finite duration, out-of-range timestamp).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
