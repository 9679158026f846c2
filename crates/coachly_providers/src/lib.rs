// --- File: crates/coachly_providers/src/lib.rs ---
//! Concrete provider clients behind the `coachly_common::services` traits.
//!
//! Each client speaks a provider's REST API through the shared HTTP client
//! and a stored bearer token. Acquiring and refreshing that token is the
//! OAuth layer's job, not ours: a missing or empty token simply renders the
//! provider "not connected".

pub mod google_calendar;
pub mod teams;
pub mod zoom;

pub use google_calendar::GoogleCalendarProvider;
pub use teams::TeamsProvider;
pub use zoom::ZoomProvider;
