//! Admin-curated catalog entities. Read-mostly; staff create them and the
//! public site lists them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    /// Unique
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub category_id: Uuid,
    /// Path of the uploaded image, served by the media layer
    pub image: Option<String>,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional long-form write-up, one per project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub project_id: Uuid,
    pub challenge: String,
    pub solution: String,
    pub key_objectives: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPhoto {
    pub id: Uuid,
    pub project_id: Uuid,
    pub image: String,
    pub caption: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAchievement {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub achieved_on: Option<NaiveDate>,
    /// Free-form metric, e.g. "50 kits" or "80% pass rate"
    pub value: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: Uuid,
    pub category_id: Uuid,
    pub image: Option<String>,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A partner school.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub image: Option<String>,
    pub badge: Option<String>,
    pub description: String,
    pub partnership_date: Option<NaiveDate>,
    pub contact_person: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub website: String,
    pub student_population: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: Uuid,
    pub school_id: Option<Uuid>,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub title: String,
    pub description: String,
    pub location: String,
    /// e.g. "Every Friday 3-5 PM"
    pub meeting_schedule: String,
    pub coordinator: String,
    pub member_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Staff-written news post. Unlike `Article`, the author is free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub image: Option<String>,
    pub author: String,
    pub date: NaiveDate,
    pub content: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Uuid,
    pub image: Option<String>,
    pub name: String,
    pub title: String,
    /// e.g. {"whatsapp": "https://wa.me/256...", "twitter": "..."}
    pub social_links: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Testimonial shown on the about and home pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceOfChange {
    pub id: Uuid,
    pub image: Option<String>,
    pub name: String,
    pub title: String,
    pub quote: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mentor {
    pub id: Uuid,
    pub image: Option<String>,
    pub name: String,
    /// Role, position or area of expertise
    pub title: String,
    pub description: String,
    pub social_links: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Mentor {
    pub const DEFAULT_NAME: &'static str = "Unnamed Mentor";
}

/// Gallery photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub image: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Downloadable file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub icon: Option<String>,
    pub title: String,
    pub description: String,
    pub file: String,
    pub file_size_bytes: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Resource {
    /// Human readable size: "512 B", "1.5 KB", "2.0 MB", or "N/A".
    pub fn file_size_label(&self) -> String {
        match self.file_size_bytes {
            Some(bytes) if bytes > 0 => {
                if bytes < 1024 {
                    format!("{bytes} B")
                } else if bytes < 1024 * 1024 {
                    format!("{:.1} KB", bytes as f64 / 1024.0)
                } else {
                    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
                }
            }
            _ => "N/A".to_string(),
        }
    }

    /// Upper-cased extension of the stored file, or "FILE".
    pub fn file_type(&self) -> String {
        let name = self.file.rsplit('/').next().unwrap_or_default();
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_uppercase(),
            _ => "FILE".to_string(),
        }
    }
}

/// Fundraising campaign card. Amounts are in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub icon: Option<String>,
    pub title: String,
    pub description: String,
    pub goal_cents: i64,
    pub raised_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Donation {
    /// Raised amount as a whole percentage of the goal, clamped to 0..=100.
    pub fn progress_percent(&self) -> u8 {
        if self.goal_cents <= 0 {
            return 0;
        }
        let percent = (self.raised_cents as i128 * 100) / self.goal_cents as i128;
        percent.clamp(0, 100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(file: &str, size: Option<i64>) -> Resource {
        Resource {
            id: Uuid::now_v7(),
            icon: None,
            title: "Toolkit".into(),
            description: String::new(),
            file: file.into(),
            file_size_bytes: size,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn resource_size_labels() {
        assert_eq!(resource("a.pdf", Some(512)).file_size_label(), "512 B");
        assert_eq!(resource("a.pdf", Some(1536)).file_size_label(), "1.5 KB");
        assert_eq!(resource("a.pdf", Some(2 * 1024 * 1024)).file_size_label(), "2.0 MB");
        assert_eq!(resource("a.pdf", None).file_size_label(), "N/A");
    }

    #[test]
    fn resource_type_comes_from_extension() {
        assert_eq!(resource("resources/files/guide.pdf", None).file_type(), "PDF");
        assert_eq!(resource("resources/files/README", None).file_type(), "FILE");
        assert_eq!(resource("resources/files/.env", None).file_type(), "FILE");
    }

    #[test]
    fn donation_progress_is_clamped() {
        let mut donation = Donation {
            id: Uuid::now_v7(),
            icon: None,
            title: "Laptops".into(),
            description: String::new(),
            goal_cents: 100_000,
            raised_cents: 25_050,
            created_at: Utc::now(),
        };
        assert_eq!(donation.progress_percent(), 25);
        donation.raised_cents = 250_000;
        assert_eq!(donation.progress_percent(), 100);
        donation.goal_cents = 0;
        assert_eq!(donation.progress_percent(), 0);
    }
}
