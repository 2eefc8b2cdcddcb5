//! Session identity and storage.

pub mod cookie;
pub mod store;

pub use cookie::{session_cookie, session_id_from_headers, SESSION_COOKIE};
pub use store::{InMemorySessionStore, SessionStore, DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS};

use std::fmt;
use uuid::Uuid;

/// Identity of one client session, carried in a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mint a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a cookie value; anything but a UUID is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_roundtrip() {
        let id = SessionId::generate();
        assert_eq!(SessionId::parse(&id.to_string()), Some(id));
        assert_ne!(SessionId::generate(), id);
    }

    #[test]
    fn test_session_id_rejects_garbage() {
        assert_eq!(SessionId::parse(""), None);
        assert_eq!(SessionId::parse("not-a-uuid"), None);
        assert_eq!(SessionId::parse("../etc/passwd"), None);
    }
}
