// --- File: crates/coachly_db/src/booking_store.rs ---
//! SQL implementation of the engine's `BookingStore` trait.
//!
//! The commit path is the one place that needs care: the conflict re-check
//! and the insert run inside a single transaction, which is the
//! serialization point that keeps two concurrent commits for overlapping
//! slots from both succeeding. The check itself is the engine's shared scan
//! (`coachly_scheduling::commit::conflict_report`), so the store can never
//! disagree with the availability filter.

use chrono::{NaiveDate, NaiveTime};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, info};
use uuid::Uuid;

use crate::client::DbClient;
use crate::error::DbError;
use coachly_common::services::{BoxFuture, MeetingPlatform};
use coachly_scheduling::commit::conflict_report;
use coachly_scheduling::models::{Booking, BookingStatus, Subject};
use coachly_scheduling::store::{BookingStore, CommitOutcome, StoreError};

const SELECT_COLUMNS: &str = "id, coach_id, client_id, group_id, title, session_date, \
     session_time, duration_minutes, origin_zone, status, meeting_platform, meeting_link, \
     external_meeting_id, location, notes";

/// SQL implementation of the booking store.
#[derive(Debug, Clone)]
pub struct SqlBookingStore {
    db_client: DbClient,
}

impl SqlBookingStore {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn booking_from_row(row: &AnyRow) -> Result<Booking, DbError> {
    fn mapping<E: std::fmt::Debug>(what: &str) -> impl Fn(E) -> DbError + '_ {
        move |e| DbError::MappingError(format!("{}: {:?}", what, e))
    }

    let id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id).map_err(|e| DbError::MappingError(e.to_string()))?;

    let client_id: Option<String> = row.try_get("client_id")?;
    let group_id: Option<String> = row.try_get("group_id")?;
    let subject = Subject::from_ids(client_id, group_id)
        .ok_or_else(|| DbError::MappingError(format!("booking {} has no valid subject", id)))?;

    let session_date: String = row.try_get("session_date")?;
    let session_date = NaiveDate::parse_from_str(&session_date, "%Y-%m-%d")
        .map_err(mapping("session_date"))?;
    let session_time: String = row.try_get("session_time")?;
    let session_time = NaiveTime::parse_from_str(&session_time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&session_time, "%H:%M"))
        .map_err(mapping("session_time"))?;

    let status: String = row.try_get("status")?;
    let status = BookingStatus::parse(&status)
        .ok_or_else(|| DbError::MappingError(format!("unknown status {:?}", status)))?;
    let platform: String = row.try_get("meeting_platform")?;
    let meeting_platform = MeetingPlatform::parse(&platform)
        .ok_or_else(|| DbError::MappingError(format!("unknown platform {:?}", platform)))?;

    let duration: i64 = row.try_get("duration_minutes")?;

    Ok(Booking {
        id,
        coach_id: row.try_get("coach_id")?,
        subject,
        title: row.try_get("title")?,
        session_date,
        session_time,
        duration_minutes: duration as u32,
        origin_zone: row.try_get("origin_zone")?,
        status,
        meeting_platform,
        meeting_link: row.try_get("meeting_link")?,
        external_meeting_id: row.try_get("external_meeting_id")?,
        location: row.try_get("location")?,
        notes: row.try_get("notes")?,
    })
}

impl BookingStore for SqlBookingStore {
    fn bookings_for_coach_window(
        &self,
        coach_id: &str,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> BoxFuture<'_, Vec<Booking>, StoreError> {
        let coach_id = coach_id.to_string();
        Box::pin(async move {
            let query = format!(
                "SELECT {} FROM bookings \
                 WHERE coach_id = $1 AND session_date >= $2 AND session_date <= $3 \
                 ORDER BY session_date, session_time",
                SELECT_COLUMNS
            );
            let rows = sqlx::query(&query)
                .bind(&coach_id)
                .bind(window_start.to_string())
                .bind(window_end.to_string())
                .fetch_all(self.db_client.pool())
                .await
                .map_err(DbError::from)?;

            let bookings = rows
                .iter()
                .map(booking_from_row)
                .collect::<Result<Vec<_>, _>>()?;
            debug!(
                "Loaded {} booking(s) for coach {} in {}..{}",
                bookings.len(),
                coach_id,
                window_start,
                window_end
            );
            Ok(bookings)
        })
    }

    fn commit_scheduled(&self, booking: Booking) -> BoxFuture<'_, CommitOutcome, StoreError> {
        Box::pin(async move {
            let mut tx = self.db_client.begin().await?;

            // Same widened window as the availability read: a local day can
            // straddle two stored UTC dates.
            let window_start = booking
                .session_date
                .pred_opt()
                .unwrap_or(booking.session_date);
            let window_end = booking
                .session_date
                .succ_opt()
                .unwrap_or(booking.session_date);

            let query = format!(
                "SELECT {} FROM bookings \
                 WHERE coach_id = $1 AND session_date >= $2 AND session_date <= $3",
                SELECT_COLUMNS
            );
            let rows = sqlx::query(&query)
                .bind(&booking.coach_id)
                .bind(window_start.to_string())
                .bind(window_end.to_string())
                .fetch_all(&mut *tx)
                .await
                .map_err(DbError::from)?;
            let existing = rows
                .iter()
                .map(booking_from_row)
                .collect::<Result<Vec<_>, _>>()?;

            let report = conflict_report(&booking, &existing);
            if !report.is_empty() {
                // Dropping the transaction rolls it back; nothing was written.
                info!(
                    "Commit for coach {} rejected: {} conflict(s)",
                    booking.coach_id,
                    report.conflicts.len()
                );
                return Ok(CommitOutcome::Conflicted(report));
            }

            sqlx::query(
                "INSERT INTO bookings (id, coach_id, client_id, group_id, title, session_date, \
                 session_time, duration_minutes, origin_zone, status, meeting_platform, \
                 meeting_link, external_meeting_id, location, notes) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
            )
            .bind(booking.id.to_string())
            .bind(&booking.coach_id)
            .bind(booking.subject.client_id())
            .bind(booking.subject.group_id())
            .bind(&booking.title)
            .bind(booking.session_date.to_string())
            .bind(booking.session_time.format("%H:%M:%S").to_string())
            .bind(booking.duration_minutes as i64)
            .bind(&booking.origin_zone)
            .bind(booking.status.as_str())
            .bind(booking.meeting_platform.as_str())
            .bind(booking.meeting_link.as_deref())
            .bind(booking.external_meeting_id.as_deref())
            .bind(booking.location.as_deref())
            .bind(booking.notes.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            tx.commit()
                .await
                .map_err(|e| DbError::TransactionError(e.to_string()))?;

            Ok(CommitOutcome::Committed(booking))
        })
    }

    fn find(&self, booking_id: Uuid) -> BoxFuture<'_, Option<Booking>, StoreError> {
        Box::pin(async move {
            let query = format!("SELECT {} FROM bookings WHERE id = $1", SELECT_COLUMNS);
            let row = sqlx::query(&query)
                .bind(booking_id.to_string())
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(DbError::from)?;

            row.as_ref()
                .map(booking_from_row)
                .transpose()
                .map_err(StoreError::from)
        })
    }

    fn attach_meeting_link(
        &self,
        booking_id: Uuid,
        platform: MeetingPlatform,
        join_link: &str,
        external_meeting_id: &str,
    ) -> BoxFuture<'_, (), StoreError> {
        let join_link = join_link.to_string();
        let external_meeting_id = external_meeting_id.to_string();
        Box::pin(async move {
            let result = sqlx::query(
                "UPDATE bookings SET meeting_platform = $1, meeting_link = $2, \
                 external_meeting_id = $3, updated_at = CURRENT_TIMESTAMP WHERE id = $4",
            )
            .bind(platform.as_str())
            .bind(&join_link)
            .bind(&external_meeting_id)
            .bind(booking_id.to_string())
            .execute(self.db_client.pool())
            .await
            .map_err(DbError::from)?;

            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(booking_id));
            }
            Ok(())
        })
    }
}
