use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The part a user plays in a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    #[default]
    Student,
    Partner,
    Mentor,
    Contributor,
}

text_enum!(ProjectRole {
    Student => "student",
    Partner => "partner",
    Mentor => "mentor",
    Contributor => "contributor",
});

impl ProjectRole {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectRole::Student => "Student",
            ProjectRole::Partner => "Partner",
            ProjectRole::Mentor => "Mentor",
            ProjectRole::Contributor => "Contributor",
        }
    }
}

/// Which self-service workflow a deployment offers for joining projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPolicy {
    /// Users join and leave immediately
    #[default]
    Direct,
    /// Users file requests that staff approve or reject
    Review,
}

text_enum!(JoinPolicy {
    Direct => "direct",
    Review => "review",
});

/// A confirmed (project, user) association. Unique per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: ProjectRole,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Self {
        Self {
            project_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }
}

/// Lifecycle of a join request. Everything but `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

text_enum!(RequestStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
    Cancelled => "cancelled",
});

/// An ask to join a project, awaiting staff review.
///
/// At most one `Pending` request exists per (project, user); storage enforces
/// this with a partial unique index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipRequest {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: ProjectRole,
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl MembershipRequest {
    pub fn pending(project_id: Uuid, user_id: Uuid, role: ProjectRole, message: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            project_id,
            user_id,
            role,
            message,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            decided_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// A membership joined with the member's username, for project pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMember {
    #[serde(flatten)]
    pub membership: Membership,
    pub username: String,
}
