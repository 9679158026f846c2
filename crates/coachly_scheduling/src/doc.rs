// File: crates/coachly_scheduling/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{
    AttachMeetingRequest, AvailabilityQuery, AvailabilityResponse, BookSessionRequest,
    BookSessionResponse, NotificationSummary, OrchestrationResponse, SlotView,
};
use crate::models::{BookingStatus, ConflictReport, ConflictingBooking};
use coachly_common::services::MeetingPlatform;

#[utoipa::path(
    get,
    path = "/schedule/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Free slots for the coach and date", body = AvailabilityResponse),
        (status = 400, description = "Malformed date, duration or zone"),
        (status = 500, description = "Internal error")
    )
)]
fn doc_get_availability_handler() {}

#[utoipa::path(
    post,
    path = "/schedule/sessions",
    request_body(content = BookSessionRequest, example = json!({
        "coach_id": "coach-42",
        "client_id": "client-7",
        "session_date": "2025-05-15",
        "session_time": "10:00",
        "duration_minutes": 60,
        "time_zone": "Europe/Zurich",
        "meeting_platform": "zoom"
    })),
    responses(
        (status = 200, description = "Session committed", body = BookSessionResponse),
        (status = 400, description = "Invalid request data"),
        (status = 409, description = "Slot no longer free", body = ConflictReport,
         example = json!({
             "error": "Time slot conflicts with existing session(s).",
             "conflicts": [{
                 "booking_id": "7f1c2f2e-6c2a-4cf8-9e7d-1d8c7a1b2c3d",
                 "title": "Anna Session",
                 "local_start": "09:00",
                 "local_end": "10:00",
                 "duration_minutes": 60
             }]
         })
        ),
        (status = 500, description = "Commit failed")
    )
)]
fn doc_book_session_handler() {}

#[utoipa::path(
    post,
    path = "/schedule/sessions/{booking_id}/meeting",
    params(
        ("booking_id" = String, Path, description = "The booking to create a meeting for")
    ),
    request_body(content = AttachMeetingRequest, example = json!({ "platform": "zoom" })),
    responses(
        (status = 200, description = "Orchestration outcome", body = OrchestrationResponse,
         example = json!({
             "status": "linked",
             "platform": null,
             "join_link": "https://zoom.us/j/123456789",
             "external_meeting_id": "123456789",
             "message": "Meeting created and linked to the session."
         })
        ),
        (status = 404, description = "Booking not found"),
        (status = 500, description = "Orchestration failed")
    )
)]
fn doc_attach_meeting_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_availability_handler,
        doc_book_session_handler,
        doc_attach_meeting_handler
    ),
    components(
        schemas(
            AvailabilityQuery,
            AvailabilityResponse,
            SlotView,
            BookSessionRequest,
            BookSessionResponse,
            AttachMeetingRequest,
            NotificationSummary,
            OrchestrationResponse,
            ConflictReport,
            ConflictingBooking,
            BookingStatus,
            MeetingPlatform
        )
    ),
    tags(
        (name = "schedule", description = "Session scheduling and availability API")
    ),
    servers(
        (url = "/api", description = "Scheduling API server")
    )
)]
pub struct SchedulingApiDoc;
