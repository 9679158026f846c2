// --- File: crates/services/coachly_backend/src/service_factory.rs ---
//! Provider factory implementation.
//!
//! Providers are instantiated once at startup, from their optional config
//! sections; the factory hands out `Arc<dyn …>` handles. A platform without
//! a configured provider simply yields `None`, which the engine reports as
//! "not connected" instead of failing the booking.

use std::sync::Arc;
use tracing::info;

use coachly_common::runtime_enabled;
use coachly_common::services::{
    CalendarProvider, MeetingPlatform, MeetingProvider, NotificationService, ProviderFactory,
};
use coachly_config::AppConfig;
use coachly_providers::{GoogleCalendarProvider, TeamsProvider, ZoomProvider};

/// Provider factory for the backend service.
pub struct CoachlyProviderFactory {
    google: Option<Arc<GoogleCalendarProvider>>,
    zoom: Option<Arc<ZoomProvider>>,
    teams: Option<Arc<TeamsProvider>>,
    notifier: Option<Arc<dyn NotificationService>>,
}

impl CoachlyProviderFactory {
    pub fn new(config: &Arc<AppConfig>, notifier: Option<Arc<dyn NotificationService>>) -> Self {
        let google = if runtime_enabled(config.use_google_calendar, config.google_calendar.as_ref())
        {
            info!("Initializing Google Calendar provider");
            config
                .google_calendar
                .as_ref()
                .map(|cfg| Arc::new(GoogleCalendarProvider::new(cfg)))
        } else {
            None
        };

        let zoom = if runtime_enabled(config.use_zoom, config.zoom.as_ref()) {
            info!("Initializing Zoom provider");
            config.zoom.as_ref().map(|cfg| Arc::new(ZoomProvider::new(cfg)))
        } else {
            None
        };

        let teams = if runtime_enabled(config.use_teams, config.teams.as_ref()) {
            info!("Initializing Teams provider");
            config
                .teams
                .as_ref()
                .map(|cfg| Arc::new(TeamsProvider::new(cfg)))
        } else {
            None
        };

        Self {
            google,
            zoom,
            teams,
            notifier,
        }
    }
}

impl ProviderFactory for CoachlyProviderFactory {
    fn calendar_provider(&self) -> Option<Arc<dyn CalendarProvider>> {
        self.google
            .clone()
            .map(|provider| provider as Arc<dyn CalendarProvider>)
    }

    fn meeting_provider(&self, platform: MeetingPlatform) -> Option<Arc<dyn MeetingProvider>> {
        match platform {
            MeetingPlatform::Zoom => self
                .zoom
                .clone()
                .map(|provider| provider as Arc<dyn MeetingProvider>),
            MeetingPlatform::GoogleMeet => self
                .google
                .clone()
                .map(|provider| provider as Arc<dyn MeetingProvider>),
            MeetingPlatform::Teams => self
                .teams
                .clone()
                .map(|provider| provider as Arc<dyn MeetingProvider>),
            MeetingPlatform::None => None,
        }
    }

    fn notification_service(&self) -> Option<Arc<dyn NotificationService>> {
        self.notifier.clone()
    }
}
