//! Environment variable handling.

use std::env;
use std::path::Path;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

/// Environment variable names.
pub mod vars {
    // Configuration
    pub const LANGCOUNTRY_CONFIG_PATH: &str = "LANGCOUNTRY_CONFIG_PATH";
    pub const LANGCOUNTRY_ENV: &str = "LANGCOUNTRY_ENV";

    // Overrides
    pub const LANGCOUNTRY_ALLOWED: &str = "LANGCOUNTRY_ALLOWED";
    pub const LANGCOUNTRY_FALLBACK: &str = "LANGCOUNTRY_FALLBACK";
    pub const LANGCOUNTRY_OVERRIDE_DIR: &str = "LANGCOUNTRY_OVERRIDE_DIR";
    pub const LANGCOUNTRY_HOST_FALLBACK: &str = "LANGCOUNTRY_HOST_FALLBACK";
    pub const LANGCOUNTRY_PORT: &str = "LANGCOUNTRY_PORT";
}

/// Environment configuration.
pub struct Environment {
    _guard: (),
}

impl Environment {
    /// Load `.env`, `.env.local` and `.env.<LANGCOUNTRY_ENV>` from the
    /// current directory. Variables already set are never overwritten.
    pub fn init() -> Result<Self, EnvError> {
        Self::init_in(&env::current_dir().unwrap_or_default())
    }

    /// Same as [`init`](Self::init), reading the files from `dir`.
    pub fn init_in(dir: &Path) -> Result<Self, EnvError> {
        load_optional(&dir.join(".env"))?;
        load_optional(&dir.join(".env.local"))?;

        if let Ok(name) = env::var(vars::LANGCOUNTRY_ENV) {
            load_optional(&dir.join(format!(".env.{}", name)))?;
        }

        Ok(Self { _guard: () })
    }

    /// Get an optional, non-blank string variable.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.trim().is_empty())
    }

    /// Get a boolean variable.
    pub fn get_bool(var: &str) -> Option<bool> {
        Self::get(var).map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
    }

    /// Get an integer variable.
    pub fn get_int<T: std::str::FromStr>(var: &str) -> Result<Option<T>, EnvError> {
        match Self::get(var) {
            Some(v) => v.trim().parse().map(Some).map_err(|_| EnvError::InvalidValue {
                var: var.to_string(),
                message: "expected integer".to_string(),
            }),
            None => Ok(None),
        }
    }

    /// Get a comma-separated list, skipping empty entries.
    pub fn get_list(var: &str) -> Option<Vec<String>> {
        Self::get(var).map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

fn load_optional(path: &Path) -> Result<(), EnvError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
