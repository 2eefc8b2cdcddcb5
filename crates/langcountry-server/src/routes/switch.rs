//! Explicit locale switching.

use crate::error::ApiResult;
use crate::middleware::CurrentSession;
use crate::state::AppState;
use crate::users::AuthenticatedUser;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::Redirect,
    Extension,
};
use tracing::{info, warn};

/// `GET /{uri}/:code`: rebind the session to an allowed code, then send the
/// client back where it came from.
///
/// Codes outside the allow-list are refused before they reach the resolver;
/// the session is left as it was.
pub async fn switch_locale(
    State(state): State<AppState>,
    CurrentSession(session_id): CurrentSession,
    user: Option<Extension<AuthenticatedUser>>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Redirect> {
    let back = back_url(&headers);

    if !state.service.allow_list().contains(&code) {
        warn!(code = %code, session = %session_id, "rejected switch to a locale outside the allow-list");
        return Ok(Redirect::to(&back));
    }

    let values = state.service.set_all_sessions(Some(&code));
    let fields = &state.fields;
    state
        .sessions
        .put(&session_id, &fields.language_code_field, values.language_code.as_str())
        .await?;
    state
        .sessions
        .put(&session_id, &fields.locale_field, values.locale.as_str())
        .await?;

    if let Some(Extension(user)) = user {
        let stored = state
            .users
            .set_language_code(&user.0, values.language_code.as_str())
            .await?;
        if !stored {
            info!(user = %user.0, "user record does not store a language code");
        }
    }

    info!(code = %values.language_code, session = %session_id, "locale switched");
    Ok(Redirect::to(&back))
}

fn back_url(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or("/")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_back_url() {
        let mut headers = HeaderMap::new();
        assert_eq!(back_url(&headers), "/");

        headers.insert(header::REFERER, HeaderValue::from_static("/dashboard?tab=2"));
        assert_eq!(back_url(&headers), "/dashboard?tab=2");

        headers.insert(header::REFERER, HeaderValue::from_static("  "));
        assert_eq!(back_url(&headers), "/");
    }
}
