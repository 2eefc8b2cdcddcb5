//! API error types.

use axum::http::StatusCode;
use langcountry_i18n::I18nError;
use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a session or user-preference backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
}

/// API error enum covering all error cases.
///
/// An unsupported locale is never an error here: hints fall back and the
/// switch endpoint ignores codes outside the allow-list.
#[derive(Debug, Error)]
pub enum ApiError {
    // 404 Not Found
    #[error("{0} not found")]
    NotFound(String),

    // 500 Internal Server Error
    #[error("Locale configuration error: {0}")]
    LocaleConfiguration(#[from] I18nError),

    #[error("Locale session missing from request")]
    LocaleSessionMissing,

    #[error("Session store error: {0}")]
    SessionStore(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,

            Self::LocaleConfiguration(_) | Self::LocaleSessionMissing | Self::SessionStore(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::LocaleConfiguration(_) => "locale_configuration_error",
            Self::LocaleSessionMissing => "locale_session_missing",
            Self::SessionStore(_) => "session_store_error",
        }
    }

    /// Check if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Check if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_faults_are_server_errors() {
        let error = ApiError::from(I18nError::UnknownLocale { code: "xx".into() });
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error_code(), "locale_configuration_error");
        assert!(error.is_server_error());
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_store_errors_convert() {
        let error = ApiError::from(StoreError::Unavailable("down".into()));
        assert_eq!(error.error_code(), "session_store_error");
        assert_eq!(error.to_string(), "Session store error: store backend unavailable: down");
    }

    #[test]
    fn test_not_found_is_the_only_client_error() {
        let error = ApiError::NotFound("Route".into());
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert!(error.is_client_error());
        assert_eq!(error.to_string(), "Route not found");
        assert!(ApiError::LocaleSessionMissing.is_server_error());
    }
}
