//! User lookup contract and an in-memory implementation.
//!
//! The auth layer never talks to a datastore directly. Schemes resolve
//! credentials through [`UserLookup`], which storage backends implement.

use std::collections::HashMap;

use crate::AuthResult;
use crate::types::UserRecord;

/// Lookup of users by the username carried in their credentials.
///
/// Calls are synchronous and may happen concurrently from many requests;
/// implementations own their consistency guarantees.
pub trait UserLookup: Send + Sync {
    /// Find a user by credential username.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` if the user exists
    /// - `Ok(None)` if it does not
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn find_by_credential_username(&self, username: &str) -> AuthResult<Option<UserRecord>>;
}

/// Immutable user store keyed by email.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: HashMap<String, UserRecord>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record, replacing any record with the same email.
    #[must_use]
    pub fn with_user(mut self, record: UserRecord) -> Self {
        self.insert(record);
        self
    }

    /// Adds a record, replacing any record with the same email.
    pub fn insert(&mut self, record: UserRecord) {
        self.users.insert(record.user.email.clone(), record);
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if the store holds no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Iterates over the stored records in email order.
    pub fn records(&self) -> impl Iterator<Item = &UserRecord> {
        let mut records: Vec<_> = self.users.values().collect();
        records.sort_by(|a, b| a.user.email.cmp(&b.user.email));
        records.into_iter()
    }
}

impl FromIterator<UserRecord> for InMemoryUserStore {
    fn from_iter<I: IntoIterator<Item = UserRecord>>(iter: I) -> Self {
        let mut store = Self::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

impl UserLookup for InMemoryUserStore {
    fn find_by_credential_username(&self, username: &str) -> AuthResult<Option<UserRecord>> {
        Ok(self.users.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::StoredHash;
    use crate::types::User;

    fn record(email: &str) -> UserRecord {
        UserRecord::new(User::new(email), StoredHash::from_phc("$argon2id$placeholder"))
    }

    #[test]
    fn test_lookup_by_email() {
        let store = InMemoryUserStore::new()
            .with_user(record("a@example.com"))
            .with_user(record("b@example.com"));

        let found = store.find_by_credential_username("b@example.com").unwrap();
        assert_eq!(found.unwrap().user.email, "b@example.com");
        assert!(store.find_by_credential_username("c@example.com").unwrap().is_none());
    }

    #[test]
    fn test_insert_replaces_same_email() {
        let store: InMemoryUserStore =
            vec![record("a@example.com"), record("a@example.com")].into_iter().collect();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_records_sorted_by_email() {
        let store: InMemoryUserStore = vec![record("z@example.com"), record("a@example.com")]
            .into_iter()
            .collect();
        let emails: Vec<_> = store.records().map(|r| r.user.email.as_str()).collect();
        assert_eq!(emails, vec!["a@example.com", "z@example.com"]);
    }
}
