//! Error types for the timebar system.

use thiserror::Error;

use crate::types::TimestampMs;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the timebar system.
#[derive(Error, Debug)]
pub enum Error {
    /// Interval bounds are reversed.
    #[error("Invalid interval: start {start} is after end {end}")]
    InvalidInterval { start: TimestampMs, end: TimestampMs },

    /// Depth-of-market ladders are empty or their lengths disagree.
    #[error("Invalid depth: {0}")]
    InvalidDepth(String),

    /// A time-ordered comparison was given an absent entity.
    #[error("Cannot order against a missing {0} entity")]
    MissingEntity(&'static str),

    /// No period is registered under the given name.
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid interval error.
    pub fn invalid_interval(start: TimestampMs, end: TimestampMs) -> Self {
        Error::InvalidInterval { start, end }
    }

    /// Create an invalid depth error.
    pub fn invalid_depth(msg: impl Into<String>) -> Self {
        Error::InvalidDepth(msg.into())
    }

    /// Create an unknown period error.
    pub fn unknown_period(name: impl Into<String>) -> Self {
        Error::UnknownPeriod(name.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
