// --- File: crates/coachly_scheduling/src/fanout.rs ---
//! Notification fan-out for committed bookings.
//!
//! One notification per interested party: the coach, and either the single
//! client or every member of the group. Each dispatch is independent — a
//! failed send is recorded and the remaining sends still run. The booking
//! itself is never touched from here.

use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::models::{Booking, Subject};
use crate::store::{Contact, Roster, StoreError};
use crate::timezone;
use coachly_common::services::{
    NotificationPayload, NotificationPriority, NotificationService,
};

/// One send that did not go through.
#[derive(Debug, Clone)]
pub struct FailedDelivery {
    pub user_id: String,
    pub reason: String,
}

/// Best-effort result of a fan-out pass.
#[derive(Debug, Clone, Default)]
pub struct FanoutReport {
    pub delivered: Vec<String>,
    pub failed: Vec<FailedDelivery>,
}

impl FanoutReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Dispatches booking announcements to everyone involved.
pub struct NotificationFanout {
    roster: Arc<dyn Roster>,
    notifier: Option<Arc<dyn NotificationService>>,
}

impl NotificationFanout {
    pub fn new(roster: Arc<dyn Roster>, notifier: Option<Arc<dyn NotificationService>>) -> Self {
        Self { roster, notifier }
    }

    /// Announce a freshly committed booking to the coach and the subject
    /// side. Failures are collected per recipient, never propagated.
    pub async fn announce_booking(&self, booking: &Booking) -> FanoutReport {
        let mut report = FanoutReport::default();
        let Some(notifier) = self.notifier.clone() else {
            // No channel configured; nothing to deliver, nothing failed.
            return report;
        };

        // Render the session in the clock the coach scheduled it in.
        let local = timezone::to_local(
            booking.session_date,
            booking.session_time,
            &booking.origin_zone,
        );
        let when = format!("{} at {}", local.date, local.time.format("%H:%M"));

        let data = json!({
            "sessionId": booking.id,
            "sessionTitle": booking.title,
            "sessionDate": local.date.to_string(),
            "sessionTime": local.time.format("%H:%M").to_string(),
        });

        if let Some(coach) = self.lookup_coach(booking, &mut report).await {
            let payload = NotificationPayload {
                kind: "system".to_string(),
                title: "Session Scheduled".to_string(),
                message: format!(
                    "Your session \"{}\" has been scheduled for {}",
                    booking.title, when
                ),
                priority: NotificationPriority::Normal,
                data: data.clone(),
            };
            send_one(&*notifier, &coach.user_id, payload, &mut report).await;
        }

        match &booking.subject {
            Subject::Client { client_id } => {
                match self.roster.client_contact(client_id).await {
                    Ok(Some(contact)) => {
                        let payload = NotificationPayload {
                            kind: "system".to_string(),
                            title: "New Session Scheduled".to_string(),
                            message: format!(
                                "Your coach has scheduled a session \"{}\" for {}",
                                booking.title, when
                            ),
                            priority: NotificationPriority::High,
                            data: data.clone(),
                        };
                        send_one(&*notifier, &contact.user_id, payload, &mut report).await;
                    }
                    Ok(None) => warn!("No roster entry for client {}", client_id),
                    Err(e) => record_lookup_failure(client_id, e, &mut report),
                }
            }
            Subject::Group { group_id } => {
                match self.roster.group_contacts(group_id).await {
                    Ok(members) => {
                        for member in members {
                            let payload = NotificationPayload {
                                kind: "system".to_string(),
                                title: "New Group Session Scheduled".to_string(),
                                message: format!(
                                    "Your coach has scheduled a group session \"{}\" for {}",
                                    booking.title, when
                                ),
                                priority: NotificationPriority::High,
                                data: data.clone(),
                            };
                            send_one(&*notifier, &member.user_id, payload, &mut report).await;
                        }
                    }
                    Err(e) => record_lookup_failure(group_id, e, &mut report),
                }
            }
        }

        report
    }

    async fn lookup_coach(&self, booking: &Booking, report: &mut FanoutReport) -> Option<Contact> {
        match self.roster.coach_contact(&booking.coach_id).await {
            Ok(Some(contact)) => Some(contact),
            Ok(None) => {
                warn!("No roster entry for coach {}", booking.coach_id);
                None
            }
            Err(e) => {
                record_lookup_failure(&booking.coach_id, e, report);
                None
            }
        }
    }
}

async fn send_one(
    notifier: &dyn NotificationService,
    user_id: &str,
    payload: NotificationPayload,
    report: &mut FanoutReport,
) {
    match notifier.send(user_id, payload).await {
        Ok(_) => report.delivered.push(user_id.to_string()),
        Err(e) => {
            warn!("Notification to {} failed: {}", user_id, e);
            report.failed.push(FailedDelivery {
                user_id: user_id.to_string(),
                reason: e.to_string(),
            });
        }
    }
}

fn record_lookup_failure(id: &str, error: StoreError, report: &mut FanoutReport) {
    warn!("Roster lookup failed for {}: {}", id, error);
    report.failed.push(FailedDelivery {
        user_id: id.to_string(),
        reason: format!("roster lookup failed: {}", error),
    });
}
