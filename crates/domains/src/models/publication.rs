use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::User;

/// A member-authored article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub image: Option<String>,
    pub author_id: Uuid,
    /// Resolved from the author's account on read; never stored on the row
    pub author_name: String,
    pub date: NaiveDate,
    pub content: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which articles a reader may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Anonymous readers
    Published,
    /// Signed-in readers also see their own drafts
    PublishedOrAuthoredBy(Uuid),
    /// Staff
    Everything,
}

impl Visibility {
    pub fn for_viewer(viewer: Option<&User>) -> Self {
        match viewer {
            None => Visibility::Published,
            Some(user) if user.is_staff => Visibility::Everything,
            Some(user) => Visibility::PublishedOrAuthoredBy(user.id),
        }
    }

    pub fn allows(&self, article: &Article) -> bool {
        match self {
            Visibility::Published => article.is_published,
            Visibility::PublishedOrAuthoredBy(user_id) => {
                article.is_published || article.author_id == *user_id
            }
            Visibility::Everything => true,
        }
    }
}
