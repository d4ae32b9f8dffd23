//! Impact statistics and spotlight highlights shown on the public pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Brand colour used whenever a theme has no palette entry.
pub const PRIMARY_COLOR: &str = "#1A685B";

/// One key statistic of an impact section, e.g. ("5,000+", "Youth trained").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub number: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub section_image: Option<String>,
    /// At most three
    pub highlights: Vec<Highlight>,
    /// Lower numbers appear first
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterType {
    People,
    Projects,
    Schools,
    Communities,
    Volunteers,
    Funds,
    Custom,
}

text_enum!(CounterType {
    People => "people",
    Projects => "projects",
    Schools => "schools",
    Communities => "communities",
    Volunteers => "volunteers",
    Funds => "funds",
    Custom => "custom",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTheme {
    Primary,
    Secondary,
    Success,
    Info,
    Warning,
    Danger,
    Custom,
}

text_enum!(ColorTheme {
    Primary => "primary",
    Secondary => "secondary",
    Success => "success",
    Info => "info",
    Warning => "warning",
    Danger => "danger",
    Custom => "custom",
});

impl ColorTheme {
    fn palette(&self) -> Option<&'static str> {
        match self {
            ColorTheme::Primary => Some("#1A685B"),
            ColorTheme::Secondary => Some("#FFAC00"),
            ColorTheme::Success => Some("#28a745"),
            ColorTheme::Info => Some("#17a2b8"),
            ColorTheme::Warning => Some("#ffc107"),
            ColorTheme::Danger => Some("#dc3545"),
            ColorTheme::Custom => None,
        }
    }
}

/// An animated counter on the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactCounter {
    pub id: Uuid,
    pub title: String,
    pub counter_type: CounterType,
    /// The number to count up to
    pub target_number: i64,
    pub prefix: String,
    pub suffix: String,
    pub icon_class: String,
    pub color_theme: ColorTheme,
    /// Hex colour, only used with `ColorTheme::Custom`
    pub custom_color: String,
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ImpactCounter {
    pub fn display_color(&self) -> &str {
        if self.color_theme == ColorTheme::Custom && !self.custom_color.is_empty() {
            return &self.custom_color;
        }
        self.color_theme.palette().unwrap_or(PRIMARY_COLOR)
    }

    /// e.g. "$1200K"
    pub fn display_value(&self) -> String {
        format!("{}{}{}", self.prefix, self.target_number, self.suffix)
    }
}

/// The fixed groups a spotlight section can highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotlightKind {
    Clubs,
    Mentors,
    Projects,
    Programs,
}

text_enum!(SpotlightKind {
    Clubs => "clubs",
    Mentors => "mentors",
    Projects => "projects",
    Programs => "programs",
});

impl SpotlightKind {
    pub fn label(&self) -> &'static str {
        match self {
            SpotlightKind::Clubs => "Best Performing Clubs",
            SpotlightKind::Mentors => "Best Performing Mentors",
            SpotlightKind::Projects => "Best Performing Projects",
            SpotlightKind::Programs => "Best Performing Programs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotlightCategory {
    pub id: Uuid,
    /// Unique
    pub kind: SpotlightKind,
    pub title: String,
    pub subtitle: String,
    pub icon_class: String,
    pub background_color: String,
    pub is_active: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Excellent,
    Outstanding,
    Exceptional,
    TopPerformer,
}

text_enum!(PerformanceLevel {
    Excellent => "excellent",
    Outstanding => "outstanding",
    Exceptional => "exceptional",
    TopPerformer => "top_performer",
});

impl PerformanceLevel {
    pub fn badge_color(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "#28a745",
            PerformanceLevel::Outstanding => "#ffc107",
            PerformanceLevel::Exceptional => "#fd7e14",
            PerformanceLevel::TopPerformer => "#dc3545",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotlightItem {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    /// Role, location or brief description
    pub subtitle: String,
    pub description: String,
    pub image: Option<String>,
    pub performance_level: PerformanceLevel,
    /// Higher ranks first within the same `order`
    pub achievement_score: i32,
    /// One achievement per line
    pub key_achievements: String,
    pub location: String,
    pub contact_info: serde_json::Value,
    pub is_featured: bool,
    pub is_active: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SpotlightItem {
    pub fn achievements(&self) -> Vec<&str> {
        self.key_achievements
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotlightStat {
    pub id: Uuid,
    pub title: String,
    /// Display string, e.g. "150+" or "2.5K"
    pub value: String,
    pub description: String,
    pub icon_class: String,
    pub color: String,
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
