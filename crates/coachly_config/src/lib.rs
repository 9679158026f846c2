// --- File: crates/coachly_config/src/lib.rs ---
//! Configuration loading for the Coachly services.
//!
//! Configuration is layered: `config/default.*`, then an optional
//! `config/{RUN_MODE}.*` file, then `APP_`-prefixed environment variables
//! (`__` as the section separator, e.g. `APP_SERVER__PORT=9000`). Secrets
//! such as provider access tokens arrive exclusively through the
//! environment layer.

pub mod models;

pub use models::{
    AppConfig, DatabaseConfig, GoogleCalendarConfig, SchedulingConfig, ServerConfig, TeamsConfig,
    ZoomConfig,
};

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use tracing::debug;

static DOTENV_LOADED: OnceCell<()> = OnceCell::new();

/// Load `.env` into the process environment exactly once.
pub fn ensure_dotenv_loaded() {
    DOTENV_LOADED.get_or_init(|| {
        if dotenv::dotenv().is_ok() {
            debug!("Loaded environment overrides from .env");
        }
    });
}

/// Loads the application configuration from files and the environment.
///
/// Dependent crates call this so they do not need to know where the
/// configuration comes from.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8086_i64)?
        .build()?
        .try_deserialize()
}
