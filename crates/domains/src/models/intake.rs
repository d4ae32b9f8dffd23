use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only message from the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A newsletter signup. Rows are never removed; `deactivate` keeps the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsletterSubscription {
    pub id: Uuid,
    /// Unique across active and inactive rows
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Where the signup came from, e.g. "website"
    pub subscription_source: String,
    /// Comma-separated areas of interest
    pub interests: String,
}

impl NewsletterSubscription {
    pub const DEFAULT_SOURCE: &'static str = "website";

    pub fn new(email: String, name: String, source: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email,
            name,
            is_active: true,
            subscribed_at: now,
            updated_at: now,
            subscription_source: source.to_string(),
            interests: String::new(),
        }
    }
}
