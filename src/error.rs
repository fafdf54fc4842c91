use crate::schedule::slot::SlotId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimetableError>;

/// Everything that can go wrong inside the timetable engine.
///
/// Format, interval and validation problems are detected locally and never
/// reach the storage collaborator. Anything the collaborator reports is
/// folded into [`TimetableError::Storage`].
#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("invalid time `{0}`, expected HH:MM")]
    InvalidTimeFormat(String),

    #[error("invalid interval {start}..{end}: end must be after start and within the day")]
    InvalidInterval { start: u16, end: u16 },

    #[error("invalid day `{0}`")]
    InvalidDay(String),

    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("candidate interval overlaps an existing slot")]
    OverlapRejected,

    #[error("no slot with id {0}")]
    NotFound(SlotId),

    #[error("slot {0} already has a request in flight")]
    SlotBusy(SlotId),

    #[error("schedule storage failed: {0}")]
    Storage(anyhow::Error),
}

impl TimetableError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Errors that were caught before any request left the process.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}
