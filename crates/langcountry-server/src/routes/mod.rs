//! Route configuration for the LangCountry server.

mod internal;
mod locale;
mod switch;

use crate::error::ApiError;
use crate::middleware::LocaleSessionLayer;
use crate::state::AppState;
use axum::{body::Body, http::Request, response::IntoResponse, routing::get, Router};
use langcountry_common_log::spans::request_span;
use tower_http::trace::TraceLayer;

/// Create the application router.
///
/// Locale routes run behind [`LocaleSessionLayer`]; internal routes and the
/// fallback do not bind a session.
pub fn create_router(state: AppState) -> Router {
    let switch_path = format!("/{}/:code", state.switcher_uri);

    Router::new()
        .route(&switch_path, get(switch::switch_locale))
        .route("/locale", get(locale::current))
        .route("/locale/selector", get(locale::selector))
        .layer(LocaleSessionLayer::new(state.clone()))
        .merge(internal::router())
        .fallback(fallback_handler)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                request_span(req.method().as_str(), req.uri().path())
            }),
        )
        .with_state(state)
}

async fn fallback_handler() -> impl IntoResponse {
    ApiError::NotFound("The requested resource was not found".into())
}
