// --- File: crates/coachly_common/src/routes.rs ---

use crate::handlers::health_check;
use axum::{routing::get, Router};

/// Creates a router containing routes common to every deployment.
pub fn routes() -> Router {
    Router::new().route("/health", get(health_check))
}
