//! Locale session binding.
//!
//! For every request: find or mint the session id, make sure both session
//! values are stored (resolving a hint when either is missing), then expose
//! a bound [`LocaleSession`] to handlers through request extensions.

use crate::error::{ApiError, ApiResult};
use crate::session::{session_cookie, session_id_from_headers, SessionId};
use crate::state::AppState;
use crate::users::AuthenticatedUser;
use async_trait::async_trait;
use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, Request},
    response::{IntoResponse, Response},
};
use langcountry_common_log::spans::{record_error, record_locale};
use langcountry_i18n::LocaleSession;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{debug, warn};

/// Layer binding a locale session to every request.
#[derive(Clone)]
pub struct LocaleSessionLayer {
    state: AppState,
}

impl LocaleSessionLayer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for LocaleSessionLayer {
    type Service = LocaleSessionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LocaleSessionMiddleware {
            inner,
            state: self.state.clone(),
        }
    }
}

/// Locale session binding middleware service.
#[derive(Clone)]
pub struct LocaleSessionMiddleware<S> {
    inner: S,
    state: AppState,
}

/// The session id of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentSession(pub SessionId);

impl<S> Service<Request<Body>> for LocaleSessionMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let state = self.state.clone();
        // Take the service that was driven to readiness.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let existing = session_id_from_headers(req.headers());
            let session_id = existing.unwrap_or_else(SessionId::generate);
            let user = req.extensions().get::<AuthenticatedUser>().cloned();

            let session =
                match bind_session(&state, session_id, user.as_ref(), req.headers()).await {
                    Ok(session) => session,
                    Err(err) => {
                        record_error(&err);
                        return Ok(err.into_response());
                    }
                };

            record_locale(session.current_locale().as_str());
            req.extensions_mut().insert(CurrentSession(session_id));
            req.extensions_mut().insert(session);

            let mut response = inner.call(req).await?;

            if existing.is_none() {
                match session_cookie(session_id) {
                    Ok(cookie) => {
                        response.headers_mut().append(header::SET_COOKIE, cookie);
                    }
                    Err(err) => warn!(error = %err, "could not encode session cookie"),
                }
            }

            Ok(response)
        })
    }
}

/// Ensure both session values exist and build the bound session.
pub async fn bind_session(
    state: &AppState,
    session_id: SessionId,
    user: Option<&AuthenticatedUser>,
    headers: &HeaderMap,
) -> ApiResult<LocaleSession> {
    let fields = &state.fields;
    let stored_code = state
        .sessions
        .get(&session_id, &fields.language_code_field)
        .await?;
    let stored_tag = state.sessions.get(&session_id, &fields.locale_field).await?;

    let code = match (stored_code, stored_tag) {
        (Some(code), Some(_)) => code,
        _ => {
            let user_code = match user {
                Some(user) => state.users.language_code(&user.0).await?,
                None => None,
            };

            let hint = match user_code.clone().flatten() {
                Some(code) => Some(code),
                None => accept_language(headers),
            };

            let values = state.service.set_all_sessions(hint.as_deref());
            state
                .sessions
                .put(&session_id, &fields.language_code_field, values.language_code.as_str())
                .await?;
            state
                .sessions
                .put(&session_id, &fields.locale_field, values.locale.as_str())
                .await?;

            if let (Some(user), Some(None)) = (user, &user_code) {
                state
                    .users
                    .set_language_code(&user.0, values.language_code.as_str())
                    .await?;
            }

            debug!(
                session = %session_id,
                hint = ?hint,
                code = %values.language_code,
                "session locale bound"
            );
            values.language_code.to_string()
        }
    };

    Ok(state.service.session(Some(&code))?)
}

fn accept_language(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Extractor for the locale session bound by [`LocaleSessionLayer`].
pub struct CurrentLocale(pub LocaleSession);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentLocale
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<LocaleSession>()
            .cloned()
            .map(CurrentLocale)
            .ok_or(ApiError::LocaleSessionMissing)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .copied()
            .ok_or(ApiError::LocaleSessionMissing)
    }
}
