// --- File: crates/coachly_scheduling/src/store.rs ---
//! Storage traits the engine depends on.
//!
//! The engine owns these traits; the database crate implements them. This
//! keeps the dependency arrow pointing at the domain and lets tests swap in
//! in-memory fakes.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Booking, ConflictReport, MeetingPlatform};
use coachly_common::services::BoxFuture;

/// Errors from the booking store or the roster.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("booking not found: {0}")]
    NotFound(Uuid),
}

/// Result of an atomic commit attempt.
#[derive(Debug)]
pub enum CommitOutcome {
    /// The slot was free; the booking is persisted with status `scheduled`.
    Committed(Booking),
    /// The slot clashed with existing bookings; nothing was written.
    Conflicted(ConflictReport),
}

/// The coach's booking table.
pub trait BookingStore: Send + Sync {
    /// All bookings for a coach whose stored UTC date falls in the inclusive
    /// window. Callers pass a widened window (±1 day) so local-day straddles
    /// are not missed.
    fn bookings_for_coach_window(
        &self,
        coach_id: &str,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> BoxFuture<'_, Vec<Booking>, StoreError>;

    /// Conflict-check and insert as one atomic unit.
    ///
    /// Implementations must run the shared conflict scan
    /// ([`crate::commit::conflicting_bookings`]) and the insert inside a
    /// single serialization point (a transaction or equivalent), so that two
    /// concurrent commits for overlapping slots cannot both succeed.
    fn commit_scheduled(&self, booking: Booking) -> BoxFuture<'_, CommitOutcome, StoreError>;

    /// Look up one booking by id.
    fn find(&self, booking_id: Uuid) -> BoxFuture<'_, Option<Booking>, StoreError>;

    /// Record the meeting link produced by orchestration, along with the
    /// platform it was created on (which may differ from the one chosen at
    /// commit when the caller retried on another platform).
    fn attach_meeting_link(
        &self,
        booking_id: Uuid,
        platform: MeetingPlatform,
        join_link: &str,
        external_meeting_id: &str,
    ) -> BoxFuture<'_, (), StoreError>;
}

/// A person reachable by the engine: for labels, attendee emails and
/// notification recipients.
#[derive(Debug, Clone)]
pub struct Contact {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
}

/// Read-only lookup of the practice roster.
pub trait Roster: Send + Sync {
    fn coach_contact(&self, coach_id: &str) -> BoxFuture<'_, Option<Contact>, StoreError>;

    fn client_contact(&self, client_id: &str) -> BoxFuture<'_, Option<Contact>, StoreError>;

    /// Every member of a group, one contact each.
    fn group_contacts(&self, group_id: &str) -> BoxFuture<'_, Vec<Contact>, StoreError>;

    fn group_name(&self, group_id: &str) -> BoxFuture<'_, Option<String>, StoreError>;
}
