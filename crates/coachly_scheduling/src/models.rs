// --- File: crates/coachly_scheduling/src/models.rs ---
//! Domain types for the scheduling engine.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use coachly_common::services::MeetingPlatform;

/// Smallest bookable session, in minutes.
pub const MIN_SESSION_MINUTES: u32 = 1;
/// Largest bookable session, in minutes (8 hours).
pub const MAX_SESSION_MINUTES: u32 = 480;
/// Minutes in one calendar day; upper bound of every busy interval.
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Lifecycle status of a booking.
///
/// `Scheduled` is the only status this engine creates; the transitions to
/// the terminal states are driven by session-management operations elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(BookingStatus::Scheduled),
            "in_progress" => Some(BookingStatus::InProgress),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "no_show" => Some(BookingStatus::NoShow),
            _ => None,
        }
    }

    /// Allowed lifecycle moves: scheduled → in_progress → completed,
    /// with cancelled/no_show reachable from either live state.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Scheduled, InProgress)
                | (Scheduled, Cancelled)
                | (Scheduled, NoShow)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
                | (InProgress, NoShow)
        )
    }
}

/// Who a session is for: exactly one individual client or one group.
///
/// The two-variant enum is what enforces the "never both, never neither"
/// invariant; the pair of nullable ids only exists at the wire and storage
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Client { client_id: String },
    Group { group_id: String },
}

impl Subject {
    pub fn client_id(&self) -> Option<&str> {
        match self {
            Subject::Client { client_id } => Some(client_id),
            Subject::Group { .. } => None,
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        match self {
            Subject::Client { .. } => None,
            Subject::Group { group_id } => Some(group_id),
        }
    }

    /// Build a subject from the nullable id pair used on the wire.
    /// Returns `None` unless exactly one id is present.
    pub fn from_ids(client_id: Option<String>, group_id: Option<String>) -> Option<Self> {
        match (client_id, group_id) {
            (Some(client_id), None) => Some(Subject::Client { client_id }),
            (None, Some(group_id)) => Some(Subject::Group { group_id }),
            _ => None,
        }
    }
}

/// A persisted coaching session booking.
///
/// `session_date` and `session_time` are stored as UTC with no embedded
/// zone; the pair denotes the absolute instant "this UTC date at this UTC
/// time". `origin_zone` records the zone the scheduling party was viewing,
/// for audit and for rendering conflicts in their local clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: Uuid,
    pub coach_id: String,
    pub subject: Subject,
    pub title: String,
    pub session_date: NaiveDate,
    pub session_time: NaiveTime,
    pub duration_minutes: u32,
    pub origin_zone: String,
    pub status: BookingStatus,
    pub meeting_platform: MeetingPlatform,
    pub meeting_link: Option<String>,
    pub external_meeting_id: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// A candidate start time drawn from the day's slot catalog, paired with
/// the requested duration. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CandidateSlot {
    /// Wall-clock start in the viewer's local zone.
    pub start: NaiveTime,
    pub duration_minutes: u32,
}

impl CandidateSlot {
    pub fn start_minute(&self) -> i32 {
        minute_of_day(self.start)
    }

    pub fn end_minute(&self) -> i32 {
        self.start_minute() + self.duration_minutes as i32
    }
}

/// Where a busy interval came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusySource {
    InternalBooking,
    ExternalCalendar,
    AllDayBlock,
}

/// A half-open `[start_minute, end_minute)` range of the viewer's local day
/// during which the coach is committed. Recomputed on every availability
/// query, never cached across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusyInterval {
    pub start_minute: i32,
    pub end_minute: i32,
    pub source: BusySource,
}

impl BusyInterval {
    pub fn new(start_minute: i32, end_minute: i32, source: BusySource) -> Self {
        Self {
            start_minute,
            end_minute,
            source,
        }
    }

    /// The full-day interval emitted for all-day external events.
    pub fn all_day() -> Self {
        Self::new(0, MINUTES_PER_DAY, BusySource::AllDayBlock)
    }
}

/// One existing booking that clashes with a requested interval.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConflictingBooking {
    pub booking_id: Uuid,
    /// Human-readable subject label, used to render "conflicts with …".
    pub title: String,
    /// Start in the requester's local clock, "HH:MM".
    pub local_start: String,
    /// End in the requester's local clock, "HH:MM".
    pub local_end: String,
    pub duration_minutes: u32,
}

/// Returned when a commit is rejected because the slot is no longer free.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConflictReport {
    pub conflicts: Vec<ConflictingBooking>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Minute-of-day for a wall-clock time (00:00 → 0, 23:30 → 1410).
pub fn minute_of_day(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Render a minute-of-day as "HH:MM", wrapping past midnight.
pub fn format_minute(minute: i32) -> String {
    let wrapped = minute.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_requires_exactly_one_id() {
        assert!(Subject::from_ids(Some("c1".into()), None).is_some());
        assert!(Subject::from_ids(None, Some("g1".into())).is_some());
        assert!(Subject::from_ids(Some("c1".into()), Some("g1".into())).is_none());
        assert!(Subject::from_ids(None, None).is_none());
    }

    #[test]
    fn status_transitions_follow_lifecycle() {
        use BookingStatus::*;
        assert!(Scheduled.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Scheduled.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Scheduled));
        assert!(!Scheduled.can_transition_to(Completed));
    }

    #[test]
    fn format_minute_wraps_past_midnight() {
        assert_eq!(format_minute(0), "00:00");
        assert_eq!(format_minute(1410), "23:30");
        assert_eq!(format_minute(1500), "01:00");
    }
}
