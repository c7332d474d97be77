//! App context: the collaborators and session shared by every screen.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::collaborators::{
    AuthProvider, CalendarSync, Coordinates, FixedLocation, InMemoryBackend, LocationProvider,
    ProfileStore, RestBackend, Session, SimulatedCalendarSync,
};
use crate::config::AppConfig;
use crate::error::AuthError;
use crate::navigation::Navigator;

/// External collaborators a screen may call.
#[derive(Clone)]
pub struct ScreenDeps {
    pub auth: Arc<dyn AuthProvider>,
    pub profiles: Arc<dyn ProfileStore>,
    pub location: Arc<dyn LocationProvider>,
    pub calendar: Arc<dyn CalendarSync>,
}

impl ScreenDeps {
    /// In-memory collaborators seeded with fixture data.
    pub fn in_memory(config: &AppConfig) -> Self {
        let backend = Arc::new(InMemoryBackend::with_fixtures());
        Self {
            auth: backend.clone(),
            profiles: backend,
            location: Arc::new(FixedLocation::granted(
                Coordinates {
                    latitude: 30.2672,
                    longitude: -97.7431,
                },
                "Austin, TX",
            )),
            calendar: Arc::new(SimulatedCalendarSync::new(config.calendar_sync_delay)),
        }
    }

    /// Hosted backend when configured, fixtures otherwise. Device location
    /// and calendar sync have no hosted counterpart and stay local.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut deps = Self::in_memory(config);
        if let Some(ref backend) = config.backend {
            let rest = Arc::new(RestBackend::new(backend));
            deps.auth = rest.clone();
            deps.profiles = rest;
        }
        deps
    }
}

/// Everything a screen needs: navigation, collaborators, config, session.
pub struct AppContext {
    pub navigator: Arc<Navigator>,
    pub deps: ScreenDeps,
    pub config: AppConfig,
    session: RwLock<Option<Session>>,
}

impl AppContext {
    pub fn new(config: AppConfig, deps: ScreenDeps, navigator: Arc<Navigator>) -> Arc<Self> {
        Arc::new(Self {
            navigator,
            deps,
            config,
            session: RwLock::new(None),
        })
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// The signed-in session, or `NotSignedIn`.
    pub async fn require_session(&self) -> Result<Session, AuthError> {
        self.session().await.ok_or(AuthError::NotSignedIn)
    }

    pub async fn set_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }

    pub async fn clear_session(&self) -> Option<Session> {
        self.session.write().await.take()
    }
}
