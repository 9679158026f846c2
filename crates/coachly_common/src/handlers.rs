// --- File: crates/coachly_common/src/handlers.rs ---
//! HTTP request handlers shared across the application.

use axum::response::Json;
use serde_json::{json, Value};

/// Liveness probe. Reports the service name and version only; readiness of
/// individual collaborators is their own concern.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "coachly",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
