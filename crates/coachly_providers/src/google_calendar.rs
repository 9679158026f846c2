// --- File: crates/coachly_providers/src/google_calendar.rs ---
//! Google Calendar client: the external busy feed, and Meet-link creation
//! for bookings that chose the `google_meet` platform.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use coachly_common::http::HTTP_CLIENT;
use coachly_common::services::{
    BoxFuture, CalendarProvider, ConnectionStatus, CreatedMeeting, ExternalCalendarEvent,
    MeetingProvider, MeetingRequest, ProviderError,
};
use coachly_config::GoogleCalendarConfig;

const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars";

/// Google Calendar as both a busy feed and a Meet-link factory.
pub struct GoogleCalendarProvider {
    access_token: Option<String>,
    calendar_id: String,
}

impl GoogleCalendarProvider {
    pub fn new(config: &GoogleCalendarConfig) -> Self {
        Self {
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
            calendar_id: config
                .calendar_id
                .clone()
                .unwrap_or_else(|| "primary".to_string()),
        }
    }

    fn token(&self) -> Result<&str, ProviderError> {
        self.access_token
            .as_deref()
            .ok_or(ProviderError::NotConnected)
    }
}

// --- Wire format -------------------------------------------------------------

#[derive(Deserialize, Debug)]
struct EventsListResponse {
    items: Option<Vec<GoogleEvent>>,
}

#[derive(Deserialize, Debug)]
struct GoogleEvent {
    summary: Option<String>,
    status: Option<String>,
    start: Option<GoogleEventTime>,
    end: Option<GoogleEventTime>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GoogleEventTime {
    /// RFC 3339 instant for timed events
    date_time: Option<String>,
    /// YYYY-MM-DD for all-day events
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CreatedEventResponse {
    id: Option<String>,
    #[serde(rename = "hangoutLink")]
    hangout_link: Option<String>,
}

/// Interpret one listed event as an interval.
///
/// Events with missing or unparseable times are skipped: an event Google
/// cannot describe must not silently block the coach's whole day.
fn parse_event(event: GoogleEvent) -> Option<ExternalCalendarEvent> {
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }
    let start = event.start?;
    let end = event.end?;

    if let (Some(start_date), Some(end_date)) = (start.date.as_deref(), end.date.as_deref()) {
        // All-day event: bounded by UTC midnights of its stated dates
        let start_day = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").ok()?;
        let end_day = NaiveDate::parse_from_str(end_date, "%Y-%m-%d").ok()?;
        return Some(ExternalCalendarEvent {
            start: Utc.from_utc_datetime(&start_day.and_hms_opt(0, 0, 0)?),
            end: Utc.from_utc_datetime(&end_day.and_hms_opt(0, 0, 0)?),
            all_day: true,
            summary: event.summary,
        });
    }

    let parse = |value: Option<&str>| -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value?)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    };
    Some(ExternalCalendarEvent {
        start: parse(start.date_time.as_deref())?,
        end: parse(end.date_time.as_deref())?,
        all_day: false,
        summary: event.summary,
    })
}

impl CalendarProvider for GoogleCalendarProvider {
    fn connection_status(&self) -> ConnectionStatus {
        if self.access_token.is_some() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::NotConnected
        }
    }

    fn list_busy_events(
        &self,
        coach_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<ExternalCalendarEvent>, ProviderError> {
        let coach_id = coach_id.to_string();
        Box::pin(async move {
            let token = self.token()?;

            // A local day can reach into the neighbouring UTC days in any
            // viewer zone; fetch wide and let the aggregator filter.
            let window_start = Utc.from_utc_datetime(
                &(date - Duration::days(1))
                    .and_hms_opt(0, 0, 0)
                    .unwrap_or_default(),
            );
            let window_end = window_start + Duration::days(3);

            let url = format!("{}/{}/events", EVENTS_URL, self.calendar_id);
            let response = HTTP_CLIENT
                .get(&url)
                .bearer_auth(token)
                .query(&[
                    ("timeMin", window_start.to_rfc3339()),
                    ("timeMax", window_end.to_rfc3339()),
                    ("singleEvents", "true".to_string()),
                    ("orderBy", "startTime".to_string()),
                ])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let listed: EventsListResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::Parse(e.to_string()))?;

            let raw = listed.items.unwrap_or_default();
            let total = raw.len();
            let events: Vec<ExternalCalendarEvent> =
                raw.into_iter().filter_map(parse_event).collect();
            if events.len() < total {
                debug!(
                    "Skipped {} unparseable calendar event(s) for coach {}",
                    total - events.len(),
                    coach_id
                );
            }
            Ok(events)
        })
    }
}

impl MeetingProvider for GoogleCalendarProvider {
    fn connection_status(&self) -> ConnectionStatus {
        CalendarProvider::connection_status(self)
    }

    /// Create a calendar event with an attached Meet conference and return
    /// its join link.
    fn create_meeting(
        &self,
        request: MeetingRequest,
    ) -> BoxFuture<'_, CreatedMeeting, ProviderError> {
        Box::pin(async move {
            let token = self.token()?;

            let end = request.start + Duration::minutes(request.duration_minutes as i64);
            let attendees: Vec<serde_json::Value> = request
                .attendee_emails
                .iter()
                .map(|email| serde_json::json!({ "email": email }))
                .collect();
            let body = serde_json::json!({
                "summary": request.topic,
                "description": request.agenda,
                "start": GoogleEventTime {
                    date_time: Some(request.start.to_rfc3339()),
                    date: None,
                    time_zone: Some(request.time_zone.clone()),
                },
                "end": GoogleEventTime {
                    date_time: Some(end.to_rfc3339()),
                    date: None,
                    time_zone: Some(request.time_zone.clone()),
                },
                "attendees": attendees,
                "conferenceData": {
                    "createRequest": {
                        "requestId": uuid::Uuid::new_v4().to_string(),
                        "conferenceSolutionKey": { "type": "hangoutsMeet" },
                    }
                },
            });

            let url = format!(
                "{}/{}/events?conferenceDataVersion=1&sendUpdates=all",
                EVENTS_URL, self.calendar_id
            );
            let response = HTTP_CLIENT
                .post(&url)
                .bearer_auth(token)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let created: CreatedEventResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::Parse(e.to_string()))?;

            let join_link = created
                .hangout_link
                .ok_or_else(|| ProviderError::Parse("event has no Meet link".to_string()))?;
            Ok(CreatedMeeting {
                external_meeting_id: created.id.unwrap_or_default(),
                join_link,
                passcode: None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(date_time: &str) -> GoogleEventTime {
        GoogleEventTime {
            date_time: Some(date_time.to_string()),
            date: None,
            time_zone: None,
        }
    }

    #[test]
    fn timed_event_parses_to_instants() {
        let event = GoogleEvent {
            summary: Some("standup".into()),
            status: Some("confirmed".into()),
            start: Some(timed("2024-03-10T09:00:00Z")),
            end: Some(timed("2024-03-10T09:30:00Z")),
        };
        let parsed = parse_event(event).expect("parses");
        assert!(!parsed.all_day);
        assert_eq!(parsed.end - parsed.start, Duration::minutes(30));
    }

    #[test]
    fn all_day_event_sets_the_flag() {
        let event = GoogleEvent {
            summary: None,
            status: None,
            start: Some(GoogleEventTime {
                date_time: None,
                date: Some("2024-03-10".into()),
                time_zone: None,
            }),
            end: Some(GoogleEventTime {
                date_time: None,
                date: Some("2024-03-11".into()),
                time_zone: None,
            }),
        };
        let parsed = parse_event(event).expect("parses");
        assert!(parsed.all_day);
    }

    #[test]
    fn unparseable_and_cancelled_events_are_dropped() {
        let broken = GoogleEvent {
            summary: None,
            status: None,
            start: Some(timed("not-a-time")),
            end: Some(timed("2024-03-10T09:30:00Z")),
        };
        assert!(parse_event(broken).is_none());

        let cancelled = GoogleEvent {
            summary: None,
            status: Some("cancelled".into()),
            start: Some(timed("2024-03-10T09:00:00Z")),
            end: Some(timed("2024-03-10T09:30:00Z")),
        };
        assert!(parse_event(cancelled).is_none());
    }

    #[test]
    fn missing_token_means_not_connected() {
        let provider = GoogleCalendarProvider::new(&GoogleCalendarConfig {
            calendar_id: Some("primary".into()),
            access_token: None,
        });
        assert_eq!(
            CalendarProvider::connection_status(&provider),
            ConnectionStatus::NotConnected
        );
    }
}
