//! Configuration file loading and parsing.

use crate::env::{vars, EnvError, Environment};
use crate::types::LangCountryConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Directory holding the config file, relative to the project.
pub const CONFIG_DIR: &str = ".langcountry";

/// Config file name.
pub const CONFIG_FILE: &str = "config.yaml";

static ENV_VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("env var pattern is valid")
});

static PATH_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.~-]+$").expect("path segment pattern is valid"));

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },

    #[error(transparent)]
    Env(#[from] EnvError),
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// Configuration loader.
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for `<project_dir>/.langcountry/config.yaml`.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            config_path: project_dir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE),
        }
    }

    /// Create a loader for an explicit config file.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    /// Loader for `LANGCOUNTRY_CONFIG_PATH` if set, else the current directory.
    pub fn from_env() -> Self {
        match Environment::get(vars::LANGCOUNTRY_CONFIG_PATH) {
            Some(path) => Self::with_file(path),
            None => Self::default(),
        }
    }

    /// Path of the config file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load, apply environment overrides and validate.
    ///
    /// A missing file yields the defaults.
    pub fn load(&self) -> Result<LangCountryConfig, ConfigError> {
        let mut config = if self.config_path.exists() {
            let contents = std::fs::read_to_string(&self.config_path)?;
            parse_config(&contents)?
        } else {
            debug!(path = %self.config_path.display(), "no config file, using defaults");
            LangCountryConfig::default()
        };

        apply_env_overrides(&mut config)?;
        validate(&config)?;
        Ok(config)
    }

    /// Load, failing if the file does not exist.
    pub fn load_required(&self) -> Result<LangCountryConfig, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound {
                path: self.config_path.clone(),
            });
        }
        self.load()
    }

    /// Save configuration to file.
    pub fn save(&self, config: &LangCountryConfig) -> Result<(), ConfigError> {
        if let Some(dir) = self.config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(&self.config_path, yaml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand `${VAR}` and parse YAML.
pub fn parse_config(contents: &str) -> Result<LangCountryConfig, ConfigError> {
    let expanded = expand_env_vars(contents)?;
    serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
pub fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(content.len());
    let mut last = 0;

    for cap in ENV_VAR_RE.captures_iter(content) {
        let Some(full) = cap.get(0) else { continue };
        let var_name = &cap[1];

        let value = match (std::env::var(var_name), cap.get(2)) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.as_str().to_string(),
            (Err(_), None) => {
                return Err(ConfigError::EnvVarNotFound {
                    var: var_name.to_string(),
                })
            }
        };

        result.push_str(&content[last..full.start()]);
        result.push_str(&value);
        last = full.end();
    }

    result.push_str(&content[last..]);
    Ok(result)
}

/// Apply `LANGCOUNTRY_*` overrides on top of file values.
pub fn apply_env_overrides(config: &mut LangCountryConfig) -> Result<(), ConfigError> {
    if let Some(allowed) = Environment::get_list(vars::LANGCOUNTRY_ALLOWED) {
        config.allowed = allowed;
    }
    if let Some(fallback) = Environment::get(vars::LANGCOUNTRY_FALLBACK) {
        config.fallback = fallback.trim().to_string();
    }
    if let Some(dir) = Environment::get(vars::LANGCOUNTRY_OVERRIDE_DIR) {
        config.dataset.override_dir = Some(PathBuf::from(dir));
    }
    if let Some(enabled) = Environment::get_bool(vars::LANGCOUNTRY_HOST_FALLBACK) {
        config.fallback_based_on_current_locale = enabled;
    }
    if let Some(port) = Environment::get_int(vars::LANGCOUNTRY_PORT)? {
        config.server.port = port;
    }
    Ok(())
}

/// Validate configuration values.
pub fn validate(config: &LangCountryConfig) -> Result<(), ConfigError> {
    if config.allowed.is_empty() {
        return Err(ConfigError::validation("allowed must list at least one locale code"));
    }

    let mut seen = HashSet::new();
    for code in &config.allowed {
        if !langcountry_i18n::is_well_formed(code) {
            return Err(ConfigError::validation(format!(
                "allowed contains malformed locale code '{code}' (expected e.g. 'nl' or 'es_CO')"
            )));
        }
        if !seen.insert(code.as_str()) {
            return Err(ConfigError::validation(format!(
                "allowed contains '{code}' more than once"
            )));
        }
    }

    if !seen.contains(config.fallback.as_str()) {
        return Err(ConfigError::validation(format!(
            "fallback '{}' must be one of the allowed codes",
            config.fallback
        )));
    }

    if config.session.language_code_field.trim().is_empty()
        || config.session.locale_field.trim().is_empty()
    {
        return Err(ConfigError::validation("session field names must not be empty"));
    }
    if config.session.language_code_field == config.session.locale_field {
        return Err(ConfigError::validation(
            "session.language_code_field and session.locale_field must differ",
        ));
    }

    if config.session.idle_timeout_secs == 0 || config.session.max_sessions == 0 {
        return Err(ConfigError::validation(
            "session.idle_timeout_secs and session.max_sessions must be positive",
        ));
    }

    let uri = config.switcher.uri.trim();
    if !PATH_SEGMENT_RE.is_match(uri) || uri == "." || uri == ".." {
        return Err(ConfigError::validation(format!(
            "switcher.uri '{uri}' must be a single path segment of letters, digits, '-', '_', '.' or '~'"
        )));
    }

    Ok(())
}
