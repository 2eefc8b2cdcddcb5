//! Shared application state.

use crate::session::{InMemorySessionStore, SessionStore};
use crate::users::{InMemoryUserPreferences, UserPreferences};
use langcountry_common_config::{LangCountryConfig, SessionConfig};
use langcountry_i18n::LangCountry;
use std::sync::Arc;

/// Application state handed to every handler and to the binding middleware.
#[derive(Clone)]
pub struct AppState {
    /// Locale service.
    pub service: LangCountry,
    /// Session value storage.
    pub sessions: Arc<dyn SessionStore>,
    /// User preference storage.
    pub users: Arc<dyn UserPreferences>,
    /// Session keys of the two stored values.
    pub fields: Arc<SessionConfig>,
    /// Path segment of the switch endpoint.
    pub switcher_uri: Arc<str>,
}

impl AppState {
    /// State with in-memory stores.
    pub fn new(service: LangCountry, config: &LangCountryConfig) -> Self {
        Self {
            service,
            sessions: Arc::new(InMemorySessionStore::with_limits(
                config.session.idle_timeout(),
                config.session.max_sessions,
            )),
            users: Arc::new(InMemoryUserPreferences::new()),
            fields: Arc::new(config.session.clone()),
            switcher_uri: Arc::from(config.switcher.uri.trim()),
        }
    }

    /// Replace the session store.
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = store;
        self
    }

    /// Replace the user preference store.
    pub fn with_user_preferences(mut self, users: Arc<dyn UserPreferences>) -> Self {
        self.users = users;
        self
    }
}
