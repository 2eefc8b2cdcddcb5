//! User records that may remember a preferred locale.

use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;

/// The authenticated user of a request, inserted into request extensions
/// by an upstream authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

/// Storage of per-user locale preferences.
#[async_trait]
pub trait UserPreferences: Send + Sync {
    /// The user's stored code.
    ///
    /// `None`: the record has no language code column (or no record).
    /// `Some(None)`: the column exists but is null.
    async fn language_code(&self, user_id: &str) -> Result<Option<Option<String>>, StoreError>;

    /// Store a code. Returns `false` when the record has no such column.
    async fn set_language_code(&self, user_id: &str, code: &str) -> Result<bool, StoreError>;
}

/// In-memory user preferences.
pub struct InMemoryUserPreferences {
    users: DashMap<String, Option<Option<String>>>,
}

impl InMemoryUserPreferences {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Add a user whose record supports a language code.
    pub fn insert_user(&self, user_id: &str, language_code: Option<&str>) {
        self.users
            .insert(user_id.to_string(), Some(language_code.map(str::to_string)));
    }

    /// Add a user whose record has no language code column.
    pub fn insert_user_without_column(&self, user_id: &str) {
        self.users.insert(user_id.to_string(), None);
    }
}

impl Default for InMemoryUserPreferences {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserPreferences for InMemoryUserPreferences {
    async fn language_code(&self, user_id: &str) -> Result<Option<Option<String>>, StoreError> {
        Ok(self.users.get(user_id).and_then(|record| record.value().clone()))
    }

    async fn set_language_code(&self, user_id: &str, code: &str) -> Result<bool, StoreError> {
        match self.users.get_mut(user_id) {
            Some(mut record) => match record.value_mut() {
                Some(column) => {
                    *column = Some(code.to_string());
                    Ok(true)
                }
                None => Ok(false),
            },
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_column_states() {
        let users = InMemoryUserPreferences::new();
        users.insert_user("ada", Some("nl"));
        users.insert_user("bob", None);
        users.insert_user_without_column("eve");

        assert_eq!(users.language_code("ada").await.unwrap(), Some(Some("nl".to_string())));
        assert_eq!(users.language_code("bob").await.unwrap(), Some(None));
        assert_eq!(users.language_code("eve").await.unwrap(), None);
        assert_eq!(users.language_code("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_language_code() {
        let users = InMemoryUserPreferences::default();
        users.insert_user("bob", None);
        users.insert_user_without_column("eve");

        assert!(users.set_language_code("bob", "es_CO").await.unwrap());
        assert_eq!(users.language_code("bob").await.unwrap(), Some(Some("es_CO".to_string())));

        assert!(!users.set_language_code("eve", "es_CO").await.unwrap());
        assert_eq!(users.language_code("eve").await.unwrap(), None);
        assert!(!users.set_language_code("nobody", "nl").await.unwrap());
    }
}
