// --- File: crates/coachly_scheduling/src/orchestrator.rs ---
//! Meeting-link orchestration after a successful commit.
//!
//! One pass per booking, no retries; anything that wants retries layers them
//! on top. The booking is the durable fact: whatever happens here is
//! reported to the caller but never unwinds the commit, because a session's
//! correctness does not depend on its video link existing.

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::SchedulingError;
use crate::models::{Booking, MeetingPlatform, Subject};
use crate::store::{BookingStore, Roster};
use coachly_common::services::{
    ConnectionStatus, MeetingRequest, ProviderFactory,
};

/// Outcome of one orchestration pass.
#[derive(Debug, Clone)]
pub enum OrchestrationOutcome {
    /// No platform was requested for this booking.
    Skipped,
    /// Meeting created and the join link is attached to the booking.
    Linked {
        join_link: String,
        external_meeting_id: String,
    },
    /// The platform has no configured/connected provider; the booking is
    /// intact and link-less.
    NotConnected { platform: MeetingPlatform },
    /// The provider call failed or timed out; the booking is intact.
    ProviderFailed {
        platform: MeetingPlatform,
        reason: String,
    },
    /// The meeting exists but writing the link back failed. Distinct from
    /// total failure so the caller can retry just the attachment.
    LinkPending {
        join_link: String,
        external_meeting_id: String,
        reason: String,
    },
}

/// Drives the external meeting creation for committed bookings.
pub struct MeetingOrchestrator {
    store: Arc<dyn BookingStore>,
    roster: Arc<dyn Roster>,
    providers: Arc<dyn ProviderFactory>,
    provider_timeout: Duration,
}

impl MeetingOrchestrator {
    pub fn new(
        store: Arc<dyn BookingStore>,
        roster: Arc<dyn Roster>,
        providers: Arc<dyn ProviderFactory>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            store,
            roster,
            providers,
            provider_timeout,
        }
    }

    /// Create the meeting resource for a booking and attach its join link.
    ///
    /// `platform_override` lets a caller retry on a different platform than
    /// the one chosen at commit time. Errors out only when the booking
    /// cannot be loaded at all; every provider-side problem is a soft
    /// [`OrchestrationOutcome`].
    pub async fn attach_meeting(
        &self,
        booking_id: Uuid,
        platform_override: Option<MeetingPlatform>,
    ) -> Result<OrchestrationOutcome, SchedulingError> {
        let booking = self
            .store
            .find(booking_id)
            .await?
            .ok_or(SchedulingError::BookingNotFound(booking_id))?;

        let platform = platform_override.unwrap_or(booking.meeting_platform);
        if platform.is_none() {
            return Ok(OrchestrationOutcome::Skipped);
        }

        let Some(provider) = self.providers.meeting_provider(platform) else {
            warn!("No {} provider configured for booking {}", platform, booking_id);
            return Ok(OrchestrationOutcome::NotConnected { platform });
        };
        if provider.connection_status() != ConnectionStatus::Connected {
            warn!("{} provider is not connected", platform);
            return Ok(OrchestrationOutcome::NotConnected { platform });
        }

        let request = MeetingRequest {
            topic: booking.title.clone(),
            start: Utc.from_utc_datetime(&booking.session_date.and_time(booking.session_time)),
            duration_minutes: booking.duration_minutes,
            time_zone: booking.origin_zone.clone(),
            attendee_emails: self.attendee_emails(&booking).await,
            agenda: booking.notes.clone(),
        };

        let created =
            match tokio::time::timeout(self.provider_timeout, provider.create_meeting(request))
                .await
            {
                Err(_) => {
                    warn!(
                        "{} meeting creation for booking {} timed out after {:?}",
                        platform, booking_id, self.provider_timeout
                    );
                    return Ok(OrchestrationOutcome::ProviderFailed {
                        platform,
                        reason: "provider call timed out".to_string(),
                    });
                }
                Ok(Err(e)) => {
                    error!(
                        "{} meeting creation for booking {} failed: {}",
                        platform, booking_id, e
                    );
                    return Ok(OrchestrationOutcome::ProviderFailed {
                        platform,
                        reason: e.to_string(),
                    });
                }
                Ok(Ok(created)) => created,
            };

        match self
            .store
            .attach_meeting_link(
                booking.id,
                platform,
                &created.join_link,
                &created.external_meeting_id,
            )
            .await
        {
            Ok(()) => {
                info!(
                    "Attached {} link to booking {}",
                    platform, booking_id
                );
                Ok(OrchestrationOutcome::Linked {
                    join_link: created.join_link,
                    external_meeting_id: created.external_meeting_id,
                })
            }
            Err(e) => {
                // The meeting exists; losing the write must not look like a
                // provider failure or the caller would re-create the meeting.
                error!(
                    "Meeting created but link attachment failed for booking {}: {}",
                    booking_id, e
                );
                Ok(OrchestrationOutcome::LinkPending {
                    join_link: created.join_link,
                    external_meeting_id: created.external_meeting_id,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Everyone who should be invited: the subject's side plus the coach.
    async fn attendee_emails(&self, booking: &Booking) -> Vec<String> {
        let mut emails: Vec<String> = Vec::new();

        match &booking.subject {
            Subject::Client { client_id } => match self.roster.client_contact(client_id).await {
                Ok(Some(contact)) => emails.extend(contact.email),
                Ok(None) => {}
                Err(e) => warn!("Client lookup failed for {}: {}", client_id, e),
            },
            Subject::Group { group_id } => match self.roster.group_contacts(group_id).await {
                Ok(contacts) => {
                    emails.extend(contacts.into_iter().filter_map(|contact| contact.email))
                }
                Err(e) => warn!("Group lookup failed for {}: {}", group_id, e),
            },
        }

        if let Ok(Some(coach)) = self.roster.coach_contact(&booking.coach_id).await {
            if let Some(email) = coach.email {
                if !emails.contains(&email) {
                    emails.push(email);
                }
            }
        }

        emails
    }
}
