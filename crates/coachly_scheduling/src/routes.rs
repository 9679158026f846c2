// --- File: crates/coachly_scheduling/src/routes.rs ---

use crate::handlers::{
    attach_meeting_handler, book_session_handler, get_availability_handler, SchedulingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all routes for the scheduling feature.
pub fn routes(state: Arc<SchedulingState>) -> Router {
    Router::new()
        .route("/schedule/availability", get(get_availability_handler))
        .route("/schedule/sessions", post(book_session_handler))
        .route(
            "/schedule/sessions/{booking_id}/meeting",
            post(attach_meeting_handler),
        )
        .with_state(state)
}
