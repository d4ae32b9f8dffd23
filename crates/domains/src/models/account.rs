use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named permission attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// May author and edit articles
    Member,
}

text_enum!(Capability { Member => "member" });

/// A registered account. Staff accounts bypass ownership checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// May be empty; `display_name` falls back to the username
    pub full_name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_staff: bool,
    pub capabilities: BTreeSet<Capability>,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            username,
            email,
            full_name: String::new(),
            password_hash,
            is_staff: false,
            capabilities: BTreeSet::new(),
            date_joined: Utc::now(),
        }
    }

    /// Full name, or the username when no full name was given.
    pub fn display_name(&self) -> &str {
        let full = self.full_name.trim();
        if full.is_empty() {
            &self.username
        } else {
            full
        }
    }
}

/// Pure capability check; the flag lives on the account, never in ambient state.
pub fn has_capability(user: &User, capability: Capability) -> bool {
    user.capabilities.contains(&capability)
}

/// Publication gate: true iff the account holds the `member` capability.
pub fn is_member(user: &User) -> bool {
    has_capability(user, Capability::Member)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_username() {
        let mut user = User::new("amina".into(), "amina@example.org".into(), String::new());
        assert_eq!(user.display_name(), "amina");
        user.full_name = "  Amina Nakato ".into();
        assert_eq!(user.display_name(), "Amina Nakato");
    }

    #[test]
    fn capability_is_checked_on_the_account() {
        let mut user = User::new("joel".into(), "joel@example.org".into(), String::new());
        assert!(!is_member(&user));
        user.capabilities.insert(Capability::Member);
        assert!(has_capability(&user, Capability::Member));
    }
}
