// --- File: crates/coachly_db/src/notifications.rs ---
//! Store-backed notification channel.
//!
//! Notifications are persisted rows; the client UI polls or subscribes for
//! them elsewhere. From the engine's point of view one insert is one
//! delivery attempt, which keeps the fan-out's per-recipient independence.

use tracing::debug;
use uuid::Uuid;

use crate::client::DbClient;
use crate::error::DbError;
use coachly_common::services::{
    BoxFuture, NotificationPayload, NotificationResult, NotificationService, ProviderError,
};

/// Notification channel that writes one row per recipient.
#[derive(Debug, Clone)]
pub struct SqlNotificationStore {
    db_client: DbClient,
}

impl SqlNotificationStore {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

impl NotificationService for SqlNotificationStore {
    fn send(
        &self,
        recipient_user_id: &str,
        payload: NotificationPayload,
    ) -> BoxFuture<'_, NotificationResult, ProviderError> {
        let recipient = recipient_user_id.to_string();
        Box::pin(async move {
            let id = Uuid::new_v4().to_string();
            let data = serde_json::to_string(&payload.data)
                .map_err(|e| ProviderError::Backend(e.to_string()))?;

            sqlx::query(
                "INSERT INTO notifications (id, user_id, kind, title, message, priority, data) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(&id)
            .bind(&recipient)
            .bind(&payload.kind)
            .bind(&payload.title)
            .bind(&payload.message)
            .bind(payload.priority.as_str())
            .bind(&data)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| ProviderError::Backend(DbError::from(e).to_string()))?;

            debug!("Stored notification {} for user {}", id, recipient);
            Ok(NotificationResult {
                id,
                status: "created".to_string(),
            })
        })
    }
}
