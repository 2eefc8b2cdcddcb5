//! Configuration types.

use langcountry_i18n::{AllowList, CatalogConfig, I18nError, LangCountry, LocaleCatalog};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LangCountryConfig {
    /// Supported locale codes, in resolution order.
    pub allowed: Vec<String>,
    /// Code used when nothing else matches. Must be in `allowed`.
    pub fallback: String,
    /// Resolve the host's current language when nothing is stored.
    pub fallback_based_on_current_locale: bool,
    /// Session storage keys.
    pub session: SessionConfig,
    /// Dataset locations.
    pub dataset: DatasetConfig,
    /// Switch endpoint.
    pub switcher: SwitcherConfig,
    /// HTTP listener.
    pub server: ServerConfig,
}

impl Default for LangCountryConfig {
    fn default() -> Self {
        Self {
            allowed: ["en_GB", "en_US", "nl", "nl_BE", "es_CO", "de"]
                .iter()
                .map(|code| code.to_string())
                .collect(),
            fallback: "en_GB".to_string(),
            fallback_based_on_current_locale: false,
            session: SessionConfig::default(),
            dataset: DatasetConfig::default(),
            switcher: SwitcherConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl LangCountryConfig {
    /// Build the allow-list described by `allowed` and `fallback`.
    pub fn allow_list(&self) -> Result<AllowList, I18nError> {
        AllowList::new(&self.allowed, &self.fallback)
    }

    /// Catalog settings for the configured dataset directories.
    pub fn catalog_config(&self) -> CatalogConfig {
        let mut config = CatalogConfig::default();
        if let Some(dir) = &self.dataset.bundled_dir {
            config.bundled_dir = dir.clone();
        }
        config.override_dir = self.dataset.override_dir.clone();
        config
    }

    /// Build the locale service, preloading every allowed bundle.
    pub fn build_service(&self) -> Result<LangCountry, I18nError> {
        let allow_list = self.allow_list()?;
        let catalog = LocaleCatalog::new(self.catalog_config());
        catalog.preload(&allow_list)?;

        Ok(LangCountry::new(catalog, allow_list)
            .with_host_fallback(self.fallback_based_on_current_locale))
    }
}

/// Names of the two session values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Key of the bound locale code.
    pub language_code_field: String,
    /// Key of the date-formatting locale tag.
    pub locale_field: String,
    /// Seconds a session may sit unused before it is dropped.
    pub idle_timeout_secs: u64,
    /// Upper bound on sessions kept by the in-memory store.
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language_code_field: "language_code".to_string(),
            locale_field: "locale".to_string(),
            idle_timeout_secs: 2 * 60 * 60,
            max_sessions: 10_000,
        }
    }
}

impl SessionConfig {
    /// Idle timeout as a duration.
    pub fn idle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.idle_timeout_secs)
    }
}

/// Dataset directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Shipped dataset; `None` uses the one bundled with `langcountry-i18n`.
    pub bundled_dir: Option<PathBuf>,
    /// Checked before `bundled_dir`.
    pub override_dir: Option<PathBuf>,
}

/// Locale switch endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitcherConfig {
    /// Path segment of `GET /<uri>/{code}`.
    pub uri: String,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            uri: "change_language_code".to_string(),
        }
    }
}

/// HTTP listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
