// --- File: crates/coachly_providers/src/teams.rs ---
//! Microsoft Teams meeting creation through the Graph API.

use chrono::Duration;
use serde::Deserialize;
use tracing::info;

use coachly_common::http::HTTP_CLIENT;
use coachly_common::services::{
    BoxFuture, ConnectionStatus, CreatedMeeting, MeetingProvider, MeetingRequest, ProviderError,
};
use coachly_config::TeamsConfig;

const GRAPH_URL: &str = "https://graph.microsoft.com/v1.0/me/onlineMeetings";

pub struct TeamsProvider {
    access_token: Option<String>,
}

impl TeamsProvider {
    pub fn new(config: &TeamsConfig) -> Self {
        Self {
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        }
    }
}

#[derive(Deserialize, Debug)]
struct OnlineMeetingResponse {
    id: String,
    #[serde(rename = "joinWebUrl")]
    join_web_url: String,
}

impl MeetingProvider for TeamsProvider {
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

            let end = request.start + Duration::minutes(request.duration_minutes as i64);
            let body = serde_json::json!({
                "subject": request.topic,
                "startDateTime": request.start.to_rfc3339(),
                "endDateTime": end.to_rfc3339(),
            });

            info!("Creating Teams meeting {:?}", request.topic);
            let response = HTTP_CLIENT
                .post(GRAPH_URL)
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

            let created: OnlineMeetingResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::Parse(e.to_string()))?;

            Ok(CreatedMeeting {
                external_meeting_id: created.id,
                join_link: created.join_web_url,
                passcode: None,
            })
        })
    }
}
