//! End-to-end tests of session binding and locale switching.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use langcountry_common_config::LangCountryConfig;
use langcountry_i18n::{AllowList, CatalogConfig, LangCountry, LocaleCatalog};
use langcountry_server::routes::create_router;
use langcountry_server::session::{InMemorySessionStore, SessionId, SessionStore, SESSION_COOKIE};
use langcountry_server::users::{AuthenticatedUser, InMemoryUserPreferences, UserPreferences};
use langcountry_server::{start_session_sweeper, AppState};
use langcountry_test_utils::{write_bundle, DatasetDirs};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn config() -> LangCountryConfig {
    LangCountryConfig {
        allowed: vec!["en".into(), "es_CO".into(), "nl".into()],
        fallback: "en".into(),
        ..LangCountryConfig::default()
    }
}

fn app_with_users(users: Arc<InMemoryUserPreferences>) -> Router {
    let config = config();
    let state = AppState::new(config.build_service().unwrap(), &config).with_user_preferences(users);
    create_router(state)
}

fn app() -> Router {
    app_with_users(Arc::default())
}

fn get(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(uri)
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

async fn json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `name=value` pair of the session cookie set by a response.
fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

fn bound_code(body: &Value) -> &str {
    body["locale"]["language_code"].as_str().unwrap()
}

#[tokio::test]
async fn test_first_request_binds_from_accept_language() {
    let app = app();
    let response = send(
        &app,
        get("/locale")
            .header(header::ACCEPT_LANGUAGE, "es-ES,es;q=0.9")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).unwrap();
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));

    let body = json(response).await;
    assert_eq!(bound_code(&body), "es_CO");
    assert_eq!(body["locale"]["currency_code"], "COP");
    assert_eq!(body["formats"]["date_words_without_day"], "j \\d\\e F \\d\\e Y");
    assert!(!body["now"]["date_numbers"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_cookie_keeps_binding_across_requests() {
    let app = app();
    let first = send(
        &app,
        get("/locale")
            .header(header::ACCEPT_LANGUAGE, "nl-BE")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let cookie = session_cookie(&first).unwrap();

    let second = send(
        &app,
        get("/locale")
            .header(header::COOKIE, &cookie)
            .header(header::ACCEPT_LANGUAGE, "es-ES")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert!(second.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(bound_code(&json(second).await), "nl");
}

#[tokio::test]
async fn test_invalid_cookie_mints_new_session() {
    let app = app();
    let response = send(
        &app,
        get("/locale")
            .header(header::COOKIE, format!("{SESSION_COOKIE}=not-a-uuid"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    let cookie = session_cookie(&response).unwrap();
    assert_ne!(cookie, format!("{SESSION_COOKIE}=not-a-uuid"));
    assert_eq!(bound_code(&json(response).await), "en");
}

#[tokio::test]
async fn test_switch_rebinds_and_redirects_back() {
    let app = app();
    let first = send(&app, get("/locale").body(Body::empty()).unwrap()).await;
    let cookie = session_cookie(&first).unwrap();
    assert_eq!(bound_code(&json(first).await), "en");

    let switched = send(
        &app,
        get("/change_language_code/nl")
            .header(header::COOKIE, &cookie)
            .header(header::REFERER, "/settings")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(switched.status(), StatusCode::SEE_OTHER);
    assert_eq!(switched.headers()[header::LOCATION], "/settings");

    let after = send(
        &app,
        get("/locale").header(header::COOKIE, &cookie).body(Body::empty()).unwrap(),
    )
    .await;
    let body = json(after).await;
    assert_eq!(bound_code(&body), "nl");
    assert_eq!(body["formats"]["date_numbers"], "d-m-Y");
}

#[tokio::test]
async fn test_switch_rejects_codes_outside_allow_list() {
    let app = app();
    let first = send(
        &app,
        get("/locale")
            .header(header::ACCEPT_LANGUAGE, "nl")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let cookie = session_cookie(&first).unwrap();

    for code in ["fr", "de", "es", "nl_BE"] {
        let response = send(
            &app,
            get(&format!("/change_language_code/{code}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    let after = send(
        &app,
        get("/locale").header(header::COOKIE, &cookie).body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(bound_code(&json(after).await), "nl");
}

#[tokio::test]
async fn test_authenticated_user_preference_wins() {
    let users = Arc::new(InMemoryUserPreferences::new());
    users.insert_user("ada", Some("nl"));
    let app = app_with_users(users);

    let mut request = get("/locale")
        .header(header::ACCEPT_LANGUAGE, "es-CO")
        .body(Body::empty())
        .unwrap();
    request.extensions_mut().insert(AuthenticatedUser("ada".into()));

    assert_eq!(bound_code(&json(send(&app, request).await).await), "nl");
}

#[tokio::test]
async fn test_user_code_is_persisted_on_bind_and_switch() {
    let users = Arc::new(InMemoryUserPreferences::new());
    users.insert_user("bob", None);
    let app = app_with_users(users.clone());

    let mut request = get("/locale")
        .header(header::ACCEPT_LANGUAGE, "es")
        .body(Body::empty())
        .unwrap();
    request.extensions_mut().insert(AuthenticatedUser("bob".into()));
    let response = send(&app, request).await;
    let cookie = session_cookie(&response).unwrap();
    assert_eq!(users.language_code("bob").await.unwrap(), Some(Some("es_CO".into())));

    let mut switch = get("/change_language_code/en")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    switch.extensions_mut().insert(AuthenticatedUser("bob".into()));
    send(&app, switch).await;
    assert_eq!(users.language_code("bob").await.unwrap(), Some(Some("en".into())));
}

#[tokio::test]
async fn test_selector_partitions_allow_list() {
    let app = app();
    let response = send(
        &app,
        get("/locale/selector")
            .header(header::ACCEPT_LANGUAGE, "es")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["current"]["language_code"], "es_CO");
    let available: Vec<_> = body["available"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["language_code"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(available, vec!["en", "nl"]);
}

#[tokio::test]
async fn test_health_does_not_bind_a_session() {
    let app = app();
    let response = send(&app, get("/health").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body = json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["locales"]["allowed"], 3);
    assert_eq!(body["locales"]["loaded"], 3);
    assert_eq!(body["locales"]["fallback"], "en");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let response = send(&app(), get("/nope").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_corrupt_bundle_is_a_configuration_error() {
    let dirs = DatasetDirs::new();
    write_bundle(dirs.overrides(), "nl", "{ \"lang\": ");

    let catalog = LocaleCatalog::new(CatalogConfig::default().with_override_dir(dirs.overrides()));
    let allow_list = AllowList::new(["en", "nl"], "en").unwrap();
    let service = LangCountry::new(catalog, allow_list);
    let app = create_router(AppState::new(service, &LangCountryConfig::default()));

    let response = send(
        &app,
        get("/locale")
            .header(header::ACCEPT_LANGUAGE, "nl")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(response).await["error"]["code"], "locale_configuration_error");

    // Healthy locales keep working.
    let response = send(&app, get("/locale").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cookieless_traffic_keeps_session_store_bounded() {
    let mut config = config();
    config.session.max_sessions = 50;
    let store = Arc::new(InMemorySessionStore::with_limits(
        config.session.idle_timeout(),
        config.session.max_sessions,
    ));
    let state = AppState::new(config.build_service().unwrap(), &config)
        .with_session_store(store.clone());
    let app = create_router(state);

    for _ in 0..200 {
        let response = send(&app, get("/locale").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(store.len(), 50);
}

#[tokio::test]
async fn test_sweeper_drops_idle_sessions() {
    let store = Arc::new(InMemorySessionStore::with_limits(Duration::from_millis(20), 100));
    for _ in 0..5 {
        store.put(&SessionId::generate(), "language_code", "nl").await.unwrap();
    }

    let sweeper = start_session_sweeper(store.clone(), Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(100)).await;
    sweeper.abort();

    assert!(store.is_empty());
}
