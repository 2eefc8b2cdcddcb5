//! Session cookie handling.

use super::SessionId;
use axum::http::header::{self, InvalidHeaderValue};
use axum::http::{HeaderMap, HeaderValue};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "langcountry_session";

/// Session id from the `Cookie` header, if present and well-formed.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::parse(value))
}

/// `Set-Cookie` value for a newly minted session.
pub fn session_cookie(id: SessionId) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_session_id_from_cookie() {
        let id = SessionId::generate();
        let found = session_id_from_headers(&headers(&format!("theme=dark; {SESSION_COOKIE}={id}; other=value")));
        assert_eq!(found, Some(id));
    }

    #[test]
    fn test_missing_or_malformed_cookie() {
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
        assert_eq!(session_id_from_headers(&headers("theme=dark")), None);
        assert_eq!(session_id_from_headers(&headers(&format!("{SESSION_COOKIE}=nope"))), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let id = SessionId::generate();
        let cookie = session_cookie(id).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE}={id}")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
    }
}
