// --- File: crates/coachly_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! This module defines the trait seam between the scheduling engine and the
//! outside world: the external calendar feed, the meeting-link providers and
//! the notification channel. Concrete implementations live in the provider
//! and database crates; the engine only ever sees these traits, which keeps
//! the per-platform branching out of the core logic and makes the whole
//! orchestration path testable with in-memory fakes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Errors returned by external-service calls.
///
/// All provider implementations share this one error type so the engine can
/// hold `Arc<dyn …>` trait objects without an adapter layer per provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider is configured but has no usable credentials.
    #[error("provider not connected")]
    NotConnected,
    /// The provider did not answer within the per-call deadline.
    #[error("provider call timed out")]
    Timeout,
    /// The provider answered with a non-success status.
    #[error("provider API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// Transport-level failure before a response was received.
    #[error("provider HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// The provider's payload could not be interpreted.
    #[error("failed to parse provider response: {0}")]
    Parse(String),
    /// A locally backed service (e.g. the notification store) failed.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Whether a provider has a live, usable connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    NotConnected,
}

/// The meeting platform requested for a booking.
///
/// `None` means the session has no video component; the orchestration step
/// is skipped entirely for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum MeetingPlatform {
    #[default]
    None,
    Zoom,
    GoogleMeet,
    Teams,
}

impl MeetingPlatform {
    pub fn is_none(self) -> bool {
        matches!(self, MeetingPlatform::None)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MeetingPlatform::None => "none",
            MeetingPlatform::Zoom => "zoom",
            MeetingPlatform::GoogleMeet => "google_meet",
            MeetingPlatform::Teams => "teams",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(MeetingPlatform::None),
            "zoom" => Some(MeetingPlatform::Zoom),
            "google_meet" => Some(MeetingPlatform::GoogleMeet),
            "teams" => Some(MeetingPlatform::Teams),
            _ => None,
        }
    }
}

impl fmt::Display for MeetingPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event pulled from an externally hosted calendar.
///
/// Start and end are absolute instants; all-day events carry the flag and
/// their instants are the UTC midnights bounding the event's stated date.
/// Anything beyond interval extraction is opaque to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalCalendarEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub summary: Option<String>,
}

/// Details handed to a meeting provider when creating a meeting resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRequest {
    /// Meeting topic, usually the booking title.
    pub topic: String,
    /// Absolute start instant of the session.
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    /// IANA zone of the scheduling party, forwarded to providers that
    /// render invitations in local time.
    pub time_zone: String,
    pub attendee_emails: Vec<String>,
    pub agenda: Option<String>,
}

/// The meeting resource a provider created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedMeeting {
    pub external_meeting_id: String,
    pub join_link: String,
    pub passcode: Option<String>,
}

/// Delivery priority of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Normal,
    High,
    Urgent,
}

impl NotificationPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationPriority::Normal => "normal",
            NotificationPriority::High => "high",
            NotificationPriority::Urgent => "urgent",
        }
    }
}

/// One notification addressed to one recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Notification category (e.g. "system", "session_reminder").
    pub kind: String,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    /// Structured context for the client UI (session id, date, time, …).
    pub data: serde_json::Value,
}

/// Represents the result of a notification dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// The ID of the stored/dispatched notification.
    pub id: String,
    /// The delivery status reported by the channel.
    pub status: String,
}

/// A trait for external calendar feeds.
///
/// Absence of a connection is not an error: a disconnected feed simply
/// contributes nothing to the busy set.
pub trait CalendarProvider: Send + Sync {
    /// Whether the feed currently has usable credentials.
    fn connection_status(&self) -> ConnectionStatus;

    /// List the events that make the coach busy on the given calendar date.
    fn list_busy_events(
        &self,
        coach_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<ExternalCalendarEvent>, ProviderError>;
}

/// A trait for meeting-link providers (video conferencing platforms).
pub trait MeetingProvider: Send + Sync {
    /// Whether the provider currently has usable credentials.
    fn connection_status(&self) -> ConnectionStatus;

    /// Create a meeting resource and return its join link.
    fn create_meeting(
        &self,
        request: MeetingRequest,
    ) -> BoxFuture<'_, CreatedMeeting, ProviderError>;
}

/// A trait for the notification channel.
///
/// Each send is independent; callers are expected to collect failures
/// rather than abort on the first one.
pub trait NotificationService: Send + Sync {
    fn send(
        &self,
        recipient_user_id: &str,
        payload: NotificationPayload,
    ) -> BoxFuture<'_, NotificationResult, ProviderError>;
}

/// A factory handing out service instances.
///
/// Returning `None` means the capability is not configured for this
/// deployment, which callers treat as "not connected" rather than an error.
pub trait ProviderFactory: Send + Sync {
    /// The external calendar feed, if one is configured.
    fn calendar_provider(&self) -> Option<Arc<dyn CalendarProvider>>;

    /// The meeting provider backing the given platform, if configured.
    fn meeting_provider(&self, platform: MeetingPlatform) -> Option<Arc<dyn MeetingProvider>>;

    /// The notification channel, if one is configured.
    fn notification_service(&self) -> Option<Arc<dyn NotificationService>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_platform_round_trips_through_strings() {
        for platform in [
            MeetingPlatform::None,
            MeetingPlatform::Zoom,
            MeetingPlatform::GoogleMeet,
            MeetingPlatform::Teams,
        ] {
            assert_eq!(MeetingPlatform::parse(platform.as_str()), Some(platform));
        }
        assert_eq!(MeetingPlatform::parse("webex"), None);
    }

    #[test]
    fn default_platform_is_none() {
        assert!(MeetingPlatform::default().is_none());
    }
}
