// --- File: crates/coachly_db/src/roster.rs ---
//! SQL implementation of the engine's `Roster` trait.

use sqlx::any::AnyRow;
use sqlx::Row;

use crate::client::DbClient;
use crate::error::DbError;
use coachly_common::services::BoxFuture;
use coachly_scheduling::store::{Contact, Roster, StoreError};

/// Read-only roster lookups backed by the users/clients/groups tables.
#[derive(Debug, Clone)]
pub struct SqlRoster {
    db_client: DbClient,
}

impl SqlRoster {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn contact_from_row(row: &AnyRow) -> Result<Contact, DbError> {
    Ok(Contact {
        user_id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
    })
}

impl Roster for SqlRoster {
    fn coach_contact(&self, coach_id: &str) -> BoxFuture<'_, Option<Contact>, StoreError> {
        let coach_id = coach_id.to_string();
        Box::pin(async move {
            let row = sqlx::query("SELECT id, name, email FROM users WHERE id = $1")
                .bind(&coach_id)
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(DbError::from)?;
            row.as_ref()
                .map(contact_from_row)
                .transpose()
                .map_err(StoreError::from)
        })
    }

    fn client_contact(&self, client_id: &str) -> BoxFuture<'_, Option<Contact>, StoreError> {
        let client_id = client_id.to_string();
        Box::pin(async move {
            let row = sqlx::query(
                "SELECT u.id AS id, u.name AS name, u.email AS email \
                 FROM clients c JOIN users u ON c.user_id = u.id WHERE c.id = $1",
            )
            .bind(&client_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(DbError::from)?;
            row.as_ref()
                .map(contact_from_row)
                .transpose()
                .map_err(StoreError::from)
        })
    }

    fn group_contacts(&self, group_id: &str) -> BoxFuture<'_, Vec<Contact>, StoreError> {
        let group_id = group_id.to_string();
        Box::pin(async move {
            let rows = sqlx::query(
                "SELECT u.id AS id, u.name AS name, u.email AS email \
                 FROM group_members gm \
                 JOIN clients c ON gm.client_id = c.id \
                 JOIN users u ON c.user_id = u.id \
                 WHERE gm.group_id = $1 \
                 ORDER BY u.name",
            )
            .bind(&group_id)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(DbError::from)?;
            rows.iter()
                .map(contact_from_row)
                .collect::<Result<Vec<_>, _>>()
                .map_err(StoreError::from)
        })
    }

    fn group_name(&self, group_id: &str) -> BoxFuture<'_, Option<String>, StoreError> {
        let group_id = group_id.to_string();
        Box::pin(async move {
            let row = sqlx::query("SELECT name FROM groups WHERE id = $1")
                .bind(&group_id)
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(DbError::from)?;
            row.map(|r| r.try_get("name").map_err(DbError::from))
                .transpose()
                .map_err(StoreError::from)
        })
    }
}
