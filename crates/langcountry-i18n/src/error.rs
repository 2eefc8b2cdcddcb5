//! Error types for locale loading and allow-list construction.

use std::path::PathBuf;
use thiserror::Error;

/// i18n errors.
///
/// An unmatched hint is never an error: resolution falls back silently.
/// Every variant here is a configuration-integrity fault.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("no locale dataset for '{code}'")]
    UnknownLocale { code: String },

    #[error("corrupt locale bundle '{code}' at {}: {message}", path.display())]
    CorruptBundle {
        code: String,
        path: PathBuf,
        message: String,
    },

    #[error("failed to read locale bundle at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid allow-list: {0}")]
    InvalidAllowList(String),
}

impl I18nError {
    /// Whether this fault comes from the dataset (as opposed to the allow-list).
    pub fn is_dataset_fault(&self) -> bool {
        matches!(
            self,
            Self::UnknownLocale { .. } | Self::CorruptBundle { .. } | Self::Io { .. }
        )
    }
}

/// Result alias for i18n operations.
pub type Result<T> = std::result::Result<T, I18nError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = I18nError::UnknownLocale { code: "xx".to_string() };
        assert_eq!(error.to_string(), "no locale dataset for 'xx'");

        let error = I18nError::CorruptBundle {
            code: "nl".to_string(),
            path: PathBuf::from("/data/nl.json"),
            message: "missing field `lang`".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "corrupt locale bundle 'nl' at /data/nl.json: missing field `lang`"
        );

        let error = I18nError::InvalidAllowList("empty".to_string());
        assert_eq!(error.to_string(), "invalid allow-list: empty");
    }

    #[test]
    fn test_dataset_fault_classification() {
        assert!(I18nError::UnknownLocale { code: "xx".into() }.is_dataset_fault());
        assert!(!I18nError::InvalidAllowList("x".into()).is_dataset_fault());
    }
}
