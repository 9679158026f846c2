// --- File: crates/coachly_scheduling/src/error.rs ---
use crate::store::StoreError;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the scheduling engine.
///
/// Only the input variants are hard rejections; conflicts travel as data
/// (`ConflictReport`) and provider trouble degrades to soft outcomes, so
/// neither appears here.
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),
    #[error("Invalid duration: {0} minutes")]
    InvalidDuration(u32),
    #[error("A session needs a client or a group")]
    SubjectMissing,
    #[error("A session cannot have both a client and a group")]
    SubjectAmbiguous,
    #[error("Booking not found: {0}")]
    BookingNotFound(Uuid),
    #[error("Booking store error: {0}")]
    Store(#[from] StoreError),
}

impl SchedulingError {
    /// Whether this error is the caller's fault (maps to HTTP 400).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SchedulingError::InvalidDate(_)
                | SchedulingError::InvalidTime(_)
                | SchedulingError::InvalidDuration(_)
                | SchedulingError::SubjectMissing
                | SchedulingError::SubjectAmbiguous
        )
    }
}
