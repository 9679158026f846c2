// --- File: crates/coachly_scheduling/src/handlers.rs ---
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::availability::{available_slots, validate_selection};
use crate::busy::aggregate_busy_intervals;
use crate::commit::{BookingCommitter, BookingRequest};
use crate::error::SchedulingError;
use crate::fanout::NotificationFanout;
use crate::models::{
    format_minute, CandidateSlot, MeetingPlatform, MAX_SESSION_MINUTES, MIN_SESSION_MINUTES,
};
use crate::orchestrator::{MeetingOrchestrator, OrchestrationOutcome};
use crate::slots::slot_catalog;
use crate::store::{BookingStore, CommitOutcome, Roster};
use coachly_common::services::{ConnectionStatus, ExternalCalendarEvent, ProviderFactory};
use coachly_config::AppConfig;

/// Shared state for the scheduling routes.
#[derive(Clone)]
pub struct SchedulingState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn BookingStore>,
    pub roster: Arc<dyn Roster>,
    pub providers: Arc<dyn ProviderFactory>,
}

impl SchedulingState {
    fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.config.scheduling.provider_timeout_secs)
    }
}

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
}

fn internal_error(message: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message.into() })),
    )
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    pub coach_id: String,
    /// Target local date in YYYY-MM-DD format
    pub date: String,
    /// Session length in minutes; defaults to the configured session length
    pub duration_minutes: Option<u32>,
    /// Viewer IANA zone; defaults to the configured zone
    pub time_zone: Option<String>,
    /// Previously chosen start time ("HH:MM") to re-validate, if any
    pub selected: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotView {
    /// Local wall-clock start, "HH:MM"
    pub start_time: String,
    /// Local wall-clock end, "HH:MM"
    pub end_time: String,
    pub duration_minutes: u32,
}

impl From<&CandidateSlot> for SlotView {
    fn from(slot: &CandidateSlot) -> Self {
        SlotView {
            start_time: format_minute(slot.start_minute()),
            end_time: format_minute(slot.end_minute()),
            duration_minutes: slot.duration_minutes,
        }
    }
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailabilityResponse {
    pub slots: Vec<SlotView>,
    /// Whether an external calendar feed contributed to the busy set
    pub calendar_connected: bool,
    /// False when the requested zone was unknown and the engine degraded
    /// to pass-through conversion
    pub time_zone_recognized: bool,
    /// The caller's previous selection, echoed back only while still free
    pub selection: Option<String>,
}

/// Handler to compute free slots for a coach, date and duration.
#[axum::debug_handler]
pub async fn get_availability_handler(
    State(state): State<Arc<SchedulingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| bad_request("Invalid date format (YYYY-MM-DD)"))?;

    let duration = query
        .duration_minutes
        .unwrap_or(state.config.scheduling.default_duration_minutes);
    if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&duration) {
        return Err(bad_request(format!(
            "duration_minutes must be between {} and {}",
            MIN_SESSION_MINUTES, MAX_SESSION_MINUTES
        )));
    }

    let zone = query
        .time_zone
        .clone()
        .unwrap_or_else(|| state.config.scheduling.time_zone.clone());
    let time_zone_recognized = Tz::from_str(&zone).is_ok();

    // Widen the stored-UTC window by a day on each side: a local day can
    // straddle two UTC dates in either direction.
    let window_start = date.pred_opt().unwrap_or(date);
    let window_end = date.succ_opt().unwrap_or(date);
    let bookings = state
        .store
        .bookings_for_coach_window(&query.coach_id, window_start, window_end)
        .await
        .map_err(|e| {
            warn!("Booking window query failed: {}", e);
            internal_error("Failed to load existing sessions")
        })?;

    let (events, calendar_connected) = fetch_external_events(&state, &query.coach_id, date).await;

    let busy = aggregate_busy_intervals(date, &zone, &bookings, &events);
    let catalog = slot_catalog();
    let slots = available_slots(&catalog, &busy, duration);

    // Re-validate the caller's in-progress pick; it is cleared (omitted)
    // when no longer free.
    let selected = query
        .selected
        .as_deref()
        .and_then(|s| NaiveTime::parse_from_str(s, "%H:%M").ok());
    let selection =
        validate_selection(selected, &slots).map(|time| time.format("%H:%M").to_string());

    Ok(Json(AvailabilityResponse {
        slots: slots.iter().map(SlotView::from).collect(),
        calendar_connected,
        time_zone_recognized,
        selection,
    }))
}

/// Pull the external busy feed, best effort.
///
/// No connection means an empty contribution, not an error; fetch failures
/// and timeouts also degrade to an empty set so a flaky provider can only
/// ever *free up* the display, never block a booking.
async fn fetch_external_events(
    state: &SchedulingState,
    coach_id: &str,
    date: NaiveDate,
) -> (Vec<ExternalCalendarEvent>, bool) {
    let Some(provider) = state.providers.calendar_provider() else {
        return (Vec::new(), false);
    };
    if provider.connection_status() != ConnectionStatus::Connected {
        return (Vec::new(), false);
    }

    match tokio::time::timeout(
        state.provider_timeout(),
        provider.list_busy_events(coach_id, date),
    )
    .await
    {
        Ok(Ok(events)) => (events, true),
        Ok(Err(e)) => {
            warn!("External calendar fetch failed: {}", e);
            (Vec::new(), true)
        }
        Err(_) => {
            warn!("External calendar fetch timed out");
            (Vec::new(), true)
        }
    }
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookSessionRequest {
    pub coach_id: String,
    pub title: Option<String>,
    pub client_id: Option<String>,
    pub group_id: Option<String>,
    /// Local date in YYYY-MM-DD format
    pub session_date: String,
    /// Local start time in HH:MM format
    pub session_time: String,
    pub duration_minutes: Option<u32>,
    /// IANA zone the date/time were picked in
    pub time_zone: Option<String>,
    #[serde(default)]
    pub meeting_platform: MeetingPlatform,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NotificationSummary {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookSessionResponse {
    pub booking_id: Uuid,
    pub status: String,
    pub message: String,
    pub notifications: NotificationSummary,
}

/// Handler to commit a booking.
///
/// The commit future is spawned so that, once started, it runs to completion
/// even if the client goes away; only the response can be lost, never half a
/// commit.
#[axum::debug_handler]
pub async fn book_session_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(payload): Json<BookSessionRequest>,
) -> Result<Json<BookSessionResponse>, ApiError> {
    let session_date = NaiveDate::parse_from_str(&payload.session_date, "%Y-%m-%d")
        .map_err(|_| bad_request("Invalid session_date format (YYYY-MM-DD)"))?;
    let session_time = NaiveTime::parse_from_str(&payload.session_time, "%H:%M")
        .map_err(|_| bad_request("Invalid session_time format (HH:MM)"))?;

    let request = BookingRequest {
        coach_id: payload.coach_id,
        client_id: payload.client_id,
        group_id: payload.group_id,
        title: payload.title,
        session_date,
        session_time,
        duration_minutes: payload.duration_minutes,
        time_zone: payload
            .time_zone
            .unwrap_or_else(|| state.config.scheduling.time_zone.clone()),
        meeting_platform: payload.meeting_platform,
        location: payload.location,
        notes: payload.notes,
    };

    let committer = BookingCommitter::new(
        state.store.clone(),
        state.roster.clone(),
        state.config.scheduling.default_duration_minutes,
    );
    let outcome = tokio::spawn(async move { committer.commit(request).await })
        .await
        .map_err(|e| internal_error(format!("Commit task failed: {}", e)))?
        .map_err(|e| match e {
            e if e.is_input_error() => bad_request(e.to_string()),
            e => {
                warn!("Commit failed: {}", e);
                internal_error("Failed to create session")
            }
        })?;

    let booking = match outcome {
        CommitOutcome::Committed(booking) => booking,
        CommitOutcome::Conflicted(report) => {
            return Err((
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "Time slot conflicts with existing session(s).",
                    "conflicts": report.conflicts,
                })),
            ));
        }
    };

    // Downstream of the commit everything is best effort: the fan-out
    // reports failures but cannot fail the booking.
    let fanout = NotificationFanout::new(
        state.roster.clone(),
        state.providers.notification_service(),
    );
    let report = fanout.announce_booking(&booking).await;
    if !report.is_complete() {
        info!(
            "Booking {} announced with {} failed notification(s)",
            booking.id,
            report.failed.len()
        );
    }

    Ok(Json(BookSessionResponse {
        booking_id: booking.id,
        status: booking.status.as_str().to_string(),
        message: "Session scheduled successfully.".to_string(),
        notifications: NotificationSummary {
            delivered: report.delivered.len(),
            failed: report.failed.len(),
        },
    }))
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OrchestrationResponse {
    /// "linked" | "skipped" | "not_connected" | "provider_failed" | "link_pending"
    pub status: String,
    pub platform: Option<String>,
    pub join_link: Option<String>,
    pub external_meeting_id: Option<String>,
    pub message: String,
}

impl From<OrchestrationOutcome> for OrchestrationResponse {
    fn from(outcome: OrchestrationOutcome) -> Self {
        match outcome {
            OrchestrationOutcome::Skipped => OrchestrationResponse {
                status: "skipped".into(),
                platform: None,
                join_link: None,
                external_meeting_id: None,
                message: "No meeting platform requested for this session.".into(),
            },
            OrchestrationOutcome::Linked {
                join_link,
                external_meeting_id,
            } => OrchestrationResponse {
                status: "linked".into(),
                platform: None,
                join_link: Some(join_link),
                external_meeting_id: Some(external_meeting_id),
                message: "Meeting created and linked to the session.".into(),
            },
            OrchestrationOutcome::NotConnected { platform } => OrchestrationResponse {
                status: "not_connected".into(),
                platform: Some(platform.to_string()),
                join_link: None,
                external_meeting_id: None,
                message: format!(
                    "Session created but {} is not connected. Connect it and retry.",
                    platform
                ),
            },
            OrchestrationOutcome::ProviderFailed { platform, reason } => OrchestrationResponse {
                status: "provider_failed".into(),
                platform: Some(platform.to_string()),
                join_link: None,
                external_meeting_id: None,
                message: format!("Meeting creation on {} failed: {}", platform, reason),
            },
            OrchestrationOutcome::LinkPending {
                join_link,
                external_meeting_id,
                reason,
            } => OrchestrationResponse {
                status: "link_pending".into(),
                platform: None,
                join_link: Some(join_link),
                external_meeting_id: Some(external_meeting_id),
                message: format!(
                    "Meeting created but the link could not be saved: {}",
                    reason
                ),
            },
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AttachMeetingRequest {
    /// Platform to create the meeting on; defaults to the one chosen when
    /// the session was booked.
    pub platform: Option<MeetingPlatform>,
}

/// Handler to create the external meeting for a committed booking.
///
/// Every provider-side problem is a soft outcome in the 200 body; only an
/// unknown booking id is a hard error. The booking is never rolled back
/// from here.
#[axum::debug_handler]
pub async fn attach_meeting_handler(
    State(state): State<Arc<SchedulingState>>,
    Path(booking_id): Path<Uuid>,
    payload: Option<Json<AttachMeetingRequest>>,
) -> Result<Json<OrchestrationResponse>, ApiError> {
    let orchestrator = MeetingOrchestrator::new(
        state.store.clone(),
        state.roster.clone(),
        state.providers.clone(),
        state.provider_timeout(),
    );
    let platform_override = payload.and_then(|Json(body)| body.platform);

    match orchestrator.attach_meeting(booking_id, platform_override).await {
        Ok(outcome) => Ok(Json(OrchestrationResponse::from(outcome))),
        Err(SchedulingError::BookingNotFound(id)) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Booking not found: {}", id) })),
        )),
        Err(e) => {
            warn!("Meeting orchestration failed: {}", e);
            Err(internal_error("Failed to orchestrate meeting creation"))
        }
    }
}
