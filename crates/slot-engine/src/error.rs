//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid time of day: {hour:02}:{minute:02}")]
    InvalidTime { hour: u8, minute: u8 },

    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval { start: String, end: String },

    #[error("Invalid day of week: {0} (expected 0-6, Monday = 0)")]
    InvalidDay(u8),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SlotError>;
