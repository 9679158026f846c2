// --- File: crates/coachly_db/src/schema.rs ---
//! Schema bootstrap for the scheduling tables.
//!
//! Dates and times are stored as ISO-8601 TEXT: the `Any` driver only maps
//! scalar column types, and ISO strings order correctly for the window
//! queries the engine runs.

use crate::client::DbClient;
use crate::error::DbError;
use tracing::info;

/// Create the scheduling tables if they do not exist.
pub async fn init_schema(db: &DbClient) -> Result<(), DbError> {
    // The CHECK enforces the subject invariant at the storage boundary too:
    // exactly one of client_id/group_id, never both, never neither.
    db.execute(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id TEXT PRIMARY KEY,
            coach_id TEXT NOT NULL,
            client_id TEXT,
            group_id TEXT,
            title TEXT NOT NULL,
            session_date TEXT NOT NULL,
            session_time TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            origin_zone TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'scheduled',
            meeting_platform TEXT NOT NULL DEFAULT 'none',
            meeting_link TEXT,
            external_meeting_id TEXT,
            location TEXT,
            notes TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            CHECK ((client_id IS NULL) <> (group_id IS NULL))
        )
        "#,
    )
    .await?;

    db.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_bookings_coach_date
        ON bookings (coach_id, session_date)
        "#,
    )
    .await?;

    db.execute(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT
        )
        "#,
    )
    .await?;

    db.execute(
        r#"
        CREATE TABLE IF NOT EXISTS clients (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            coach_id TEXT NOT NULL
        )
        "#,
    )
    .await?;

    db.execute(
        r#"
        CREATE TABLE IF NOT EXISTS groups (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            coach_id TEXT NOT NULL
        )
        "#,
    )
    .await?;

    db.execute(
        r#"
        CREATE TABLE IF NOT EXISTS group_members (
            group_id TEXT NOT NULL,
            client_id TEXT NOT NULL,
            PRIMARY KEY (group_id, client_id)
        )
        "#,
    )
    .await?;

    db.execute(
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            title TEXT NOT NULL,
            message TEXT NOT NULL,
            priority TEXT NOT NULL DEFAULT 'normal',
            data TEXT,
            read INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .await?;

    info!("Scheduling schema initialized");
    Ok(())
}
