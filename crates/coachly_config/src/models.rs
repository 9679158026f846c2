// --- File: crates/coachly_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8086,
        }
    }
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. DATABASE_URL loaded via APP_DATABASE__URL
}

// --- Scheduling Policy Config ---
// Knobs for the availability/booking engine. The slot catalog itself is
// fixed policy and not configurable.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// Default IANA zone used when a request does not name one.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Session length applied when a request omits one, in minutes.
    #[serde(default = "default_session_minutes")]
    pub default_duration_minutes: u32,
    /// Deadline for any single external provider call, in seconds.
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_session_minutes() -> u32 {
    60
}

fn default_provider_timeout() -> u64 {
    10
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            default_duration_minutes: default_session_minutes(),
            provider_timeout_secs: default_provider_timeout(),
        }
    }
}

// --- Google Calendar Config ---
// Holds non-secret Google Calendar config. The access token is loaded via
// APP_GOOGLE_CALENDAR__ACCESS_TOKEN; the OAuth handshake that produced it
// lives outside this service.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GoogleCalendarConfig {
    pub calendar_id: Option<String>,
    pub access_token: Option<String>,
}

// --- Zoom Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ZoomConfig {
    pub access_token: Option<String>,
    /// Zoom user whose account hosts the meetings; "me" for the token owner.
    #[serde(default = "default_zoom_user")]
    pub host_user: String,
}

fn default_zoom_user() -> String {
    "me".to_string()
}

// --- Microsoft Teams Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TeamsConfig {
    pub access_token: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_google_calendar: bool,
    #[serde(default)]
    pub use_zoom: bool,
    #[serde(default)]
    pub use_teams: bool,
    #[serde(default)]
    pub use_notifications: bool,

    #[serde(default)]
    pub scheduling: SchedulingConfig,

    pub database: Option<DatabaseConfig>,
    pub google_calendar: Option<GoogleCalendarConfig>,
    pub zoom: Option<ZoomConfig>,
    pub teams: Option<TeamsConfig>,
}
