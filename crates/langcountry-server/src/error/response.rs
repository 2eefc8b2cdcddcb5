//! Error response implementation.

use super::types::ApiError;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            error!(error = %self, code = self.error_code(), "Server error occurred");
        } else {
            warn!(error = %self, code = self.error_code(), "Client error occurred");
        }

        let status = self.status_code();
        let code = self.error_code();

        let message = self.to_string();

        let body = ErrorResponse {
            success: false,
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}
