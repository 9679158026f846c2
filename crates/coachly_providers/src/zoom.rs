// --- File: crates/coachly_providers/src/zoom.rs ---
//! Zoom meeting creation.

use serde::{Deserialize, Serialize};
use tracing::info;

use coachly_common::http::HTTP_CLIENT;
use coachly_common::services::{
    BoxFuture, ConnectionStatus, CreatedMeeting, MeetingProvider, MeetingRequest, ProviderError,
};
use coachly_config::ZoomConfig;

const API_BASE: &str = "https://api.zoom.us/v2";
/// Zoom meeting type 2 = scheduled meeting with a fixed start time.
const SCHEDULED_MEETING: u8 = 2;

pub struct ZoomProvider {
    access_token: Option<String>,
    host_user: String,
}

impl ZoomProvider {
    pub fn new(config: &ZoomConfig) -> Self {
        Self {
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
            host_user: config.host_user.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
struct CreateMeetingBody {
    topic: String,
    #[serde(rename = "type")]
    meeting_type: u8,
    /// "yyyy-MM-ddTHH:mm:ssZ" per the Zoom API
    start_time: String,
    duration: u32,
    timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    agenda: Option<String>,
    settings: MeetingSettings,
}

#[derive(Serialize, Debug)]
struct MeetingSettings {
    join_before_host: bool,
    waiting_room: bool,
}

#[derive(Deserialize, Debug)]
struct CreateMeetingResponse {
    id: u64,
    join_url: String,
    password: Option<String>,
}

impl MeetingProvider for ZoomProvider {
    fn connection_status(&self) -> ConnectionStatus {
        if self.access_token.is_some() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::NotConnected
        }
    }

    fn create_meeting(
        &self,
        request: MeetingRequest,
    ) -> BoxFuture<'_, CreatedMeeting, ProviderError> {
        Box::pin(async move {
            let token = self
                .access_token
                .as_deref()
                .ok_or(ProviderError::NotConnected)?;

            let body = CreateMeetingBody {
                topic: request.topic.clone(),
                meeting_type: SCHEDULED_MEETING,
                start_time: request.start.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                duration: request.duration_minutes,
                timezone: request.time_zone.clone(),
                agenda: request.agenda.clone(),
                settings: MeetingSettings {
                    join_before_host: false,
                    waiting_room: true,
                },
            };

            let url = format!("{}/users/{}/meetings", API_BASE, self.host_user);
            info!("Creating Zoom meeting {:?}", request.topic);
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

            let created: CreateMeetingResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::Parse(e.to_string()))?;

            Ok(CreatedMeeting {
                external_meeting_id: created.id.to_string(),
                join_link: created.join_url,
                passcode: created.password,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_not_connected() {
        let provider = ZoomProvider::new(&ZoomConfig {
            access_token: Some(String::new()),
            host_user: "me".into(),
        });
        assert_eq!(provider.connection_status(), ConnectionStatus::NotConnected);
    }

    #[test]
    fn present_token_is_connected() {
        let provider = ZoomProvider::new(&ZoomConfig {
            access_token: Some("tok".into()),
            host_user: "me".into(),
        });
        assert_eq!(provider.connection_status(), ConnectionStatus::Connected);
    }
}
