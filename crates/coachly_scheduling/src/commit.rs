// --- File: crates/coachly_scheduling/src/commit.rs ---
//! Server-side booking commit.
//!
//! Client-computed availability is advisory: between the snapshot and the
//! submit, another booking may have landed. The committer is the single
//! authority for "is this slot really free right now" — it re-runs the same
//! conflict predicate the availability filter uses, against the live booking
//! table, atomically with the insert. The external calendar feed is *not*
//! re-polled here; only internally stored bookings gate the commit.

use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::conflict::overlaps;
use crate::error::SchedulingError;
use crate::models::{
    format_minute, minute_of_day, Booking, BookingStatus, BusyInterval, BusySource,
    ConflictReport, ConflictingBooking, MeetingPlatform, Subject, MAX_SESSION_MINUTES,
    MIN_SESSION_MINUTES,
};
use crate::store::{BookingStore, CommitOutcome, Roster};
use crate::timezone;

/// A fully specified booking request, in the scheduling party's local clock.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub coach_id: String,
    pub client_id: Option<String>,
    pub group_id: Option<String>,
    pub title: Option<String>,
    /// Local calendar date the coach picked.
    pub session_date: NaiveDate,
    /// Local wall-clock start the coach picked.
    pub session_time: NaiveTime,
    pub duration_minutes: Option<u32>,
    /// IANA zone the date/time were picked in; kept on the booking for audit.
    pub time_zone: String,
    pub meeting_platform: MeetingPlatform,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// The commit authority. Validates, converts to UTC, and delegates the
/// atomic check-and-insert to the store.
pub struct BookingCommitter {
    store: Arc<dyn BookingStore>,
    roster: Arc<dyn Roster>,
    default_duration_minutes: u32,
}

impl BookingCommitter {
    pub fn new(
        store: Arc<dyn BookingStore>,
        roster: Arc<dyn Roster>,
        default_duration_minutes: u32,
    ) -> Self {
        Self {
            store,
            roster,
            default_duration_minutes,
        }
    }

    /// Validate and commit a booking.
    ///
    /// Input problems reject before any storage I/O. A lost race returns
    /// `CommitOutcome::Conflicted` with the clashing bookings; it is not an
    /// error, the caller re-queries availability and picks again.
    pub async fn commit(&self, request: BookingRequest) -> Result<CommitOutcome, SchedulingError> {
        let duration = request
            .duration_minutes
            .unwrap_or(self.default_duration_minutes);
        if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&duration) {
            return Err(SchedulingError::InvalidDuration(duration));
        }

        let subject = match (request.client_id.clone(), request.group_id.clone()) {
            (Some(client_id), None) => Subject::Client { client_id },
            (None, Some(group_id)) => Subject::Group { group_id },
            (None, None) => return Err(SchedulingError::SubjectMissing),
            (Some(_), Some(_)) => return Err(SchedulingError::SubjectAmbiguous),
        };

        let title = match request.title.clone().filter(|t| !t.trim().is_empty()) {
            Some(title) => title,
            None => self.default_title(&subject).await,
        };

        let utc = timezone::to_utc(request.session_date, request.session_time, &request.time_zone);
        debug!(
            "Committing session for coach {} at {} {} ({}), stored as {} {} UTC",
            request.coach_id,
            request.session_date,
            request.session_time,
            request.time_zone,
            utc.date,
            utc.time,
        );

        let booking = Booking {
            id: Uuid::new_v4(),
            coach_id: request.coach_id,
            subject,
            title,
            session_date: utc.date,
            session_time: utc.time,
            duration_minutes: duration,
            origin_zone: request.time_zone,
            status: BookingStatus::Scheduled,
            meeting_platform: request.meeting_platform,
            meeting_link: None,
            external_meeting_id: None,
            location: request.location,
            notes: request.notes,
        };

        let outcome = self.store.commit_scheduled(booking).await?;
        match &outcome {
            CommitOutcome::Committed(booking) => {
                info!("Committed booking {} for coach {}", booking.id, booking.coach_id);
            }
            CommitOutcome::Conflicted(report) => {
                info!(
                    "Rejected booking for conflicts with {} existing session(s)",
                    report.conflicts.len()
                );
            }
        }
        Ok(outcome)
    }

    async fn default_title(&self, subject: &Subject) -> String {
        match subject {
            Subject::Client { client_id } => match self.roster.client_contact(client_id).await {
                Ok(Some(contact)) => format!("{} Session", contact.name),
                _ => "Coaching Session".to_string(),
            },
            Subject::Group { group_id } => match self.roster.group_name(group_id).await {
                Ok(Some(name)) => format!("{} Session", name),
                _ => "Group Session".to_string(),
            },
        }
    }
}

/// The commit-time conflict scan.
///
/// Every store implementation calls this inside its serialization point so
/// the availability filter and the commit check can never diverge: both
/// reduce to [`crate::conflict::overlaps`]. Existing bookings are projected
/// into the candidate's origin zone and only those landing on the same local
/// date can clash.
pub fn conflicting_bookings(candidate: &Booking, existing: &[Booking]) -> Vec<ConflictingBooking> {
    let local = timezone::to_local(
        candidate.session_date,
        candidate.session_time,
        &candidate.origin_zone,
    );
    let candidate_start = minute_of_day(local.time);

    existing
        .iter()
        .filter(|other| other.id != candidate.id)
        .filter_map(|other| {
            let other_local =
                timezone::to_local(other.session_date, other.session_time, &candidate.origin_zone);
            if other_local.date != local.date {
                return None;
            }
            let other_start = minute_of_day(other_local.time);
            let interval = [BusyInterval::new(
                other_start,
                other_start + other.duration_minutes as i32,
                BusySource::InternalBooking,
            )];
            if !overlaps(candidate_start, candidate.duration_minutes, &interval) {
                return None;
            }
            Some(ConflictingBooking {
                booking_id: other.id,
                title: other.title.clone(),
                local_start: format_minute(other_start),
                local_end: format_minute(other_start + other.duration_minutes as i32),
                duration_minutes: other.duration_minutes,
            })
        })
        .collect()
}

/// Convenience wrapper used by store implementations.
pub fn conflict_report(candidate: &Booking, existing: &[Booking]) -> ConflictReport {
    ConflictReport {
        conflicts: conflicting_bookings(candidate, existing),
    }
}
