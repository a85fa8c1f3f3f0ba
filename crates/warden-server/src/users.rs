//! User file loading and the `log-users` report.
//!
//! The user file is a JSON array of records:
//!
//! ```json
//! [
//!   {
//!     "id": "5c1b...",
//!     "email": "bob@example.com",
//!     "first_name": "Bob",
//!     "password_hash": "$argon2id$v=19$m=19456,t=2,p=1$..."
//!   }
//! ]
//! ```

use std::path::Path;

use anyhow::Context;
use warden_auth::{InMemoryUserStore, UserRecord};

use crate::config::UsersConfig;

/// Logger name under which user rows are reported.
pub const USER_DATA_TARGET: &str = "user_data";

/// Load a user store from a JSON user file.
pub fn load_user_store(path: &Path) -> anyhow::Result<InMemoryUserStore> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read user file {}", path.display()))?;
    let records: Vec<UserRecord> = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse user file {}", path.display()))?;
    Ok(records.into_iter().collect())
}

/// Build the user store named by configuration; empty when no file is set.
pub fn user_store(config: &UsersConfig) -> anyhow::Result<InMemoryUserStore> {
    match &config.path {
        Some(path) => {
            let store = load_user_store(path)?;
            tracing::info!(path = %path.display(), count = store.len(), "User file loaded");
            Ok(store)
        }
        None => {
            tracing::warn!("No user file configured; every credential will be rejected");
            Ok(InMemoryUserStore::new())
        }
    }
}

/// Render a user as `key=value` segments.
///
/// The keys line up with the default PII field set, so a redacting
/// formatter hides everything but the id. Any separator inside a value is
/// replaced by a space so each value stays within its own segment.
pub fn user_row(record: &UserRecord, separator: char) -> String {
    let user = &record.user;
    let value = |v: &str| v.replace(separator, " ");
    format!(
        "id={}{separator} email={}{separator} name={}{separator} password={}{separator}",
        value(&user.id),
        value(&user.email),
        value(&user.display_name()),
        value(record.password_hash.as_str()),
    )
}

/// Log every stored user at INFO under [`USER_DATA_TARGET`].
///
/// Returns the number of users logged.
pub fn log_users(store: &InMemoryUserStore, separator: char) -> usize {
    let mut count = 0;
    for record in store.records() {
        tracing::info!(target: USER_DATA_TARGET, "{}", user_row(record, separator));
        count += 1;
    }
    count
}
