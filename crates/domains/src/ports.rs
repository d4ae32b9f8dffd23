//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be used by the binary.
//! Repositories report uniqueness violations as `DomainError::Conflict` with
//! the matching `ConflictKind`; the storage layer is the only guard against
//! double submissions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::*;

/// Account persistence.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict(UsernameTaken)` on a duplicate username.
    async fn insert_user(&self, user: User) -> Result<User>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Returns `true` when the capability was newly granted.
    async fn grant_capability(&self, user_id: Uuid, capability: Capability) -> Result<bool>;
}

/// Staff-curated catalog: categories, projects, programs, schools, clubs and
/// blog posts. List methods return rows in their display order.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn get_category(&self, id: Uuid) -> Result<Option<Category>>;
    /// Fails with `Conflict(DuplicateName)` when the name is taken.
    async fn insert_category(&self, category: Category) -> Result<Category>;

    /// Newest first, then by title.
    async fn list_projects(&self, limit: i64, offset: i64) -> Result<Vec<Project>>;
    async fn count_projects(&self) -> Result<i64>;
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>>;
    async fn insert_project(&self, project: Project) -> Result<Project>;
    /// Cascades to memberships, requests, details, photos and achievements.
    async fn delete_project(&self, id: Uuid) -> Result<bool>;
    async fn get_project_details(&self, project_id: Uuid) -> Result<Option<ProjectDetails>>;
    async fn list_project_photos(&self, project_id: Uuid) -> Result<Vec<ProjectPhoto>>;
    async fn list_project_achievements(&self, project_id: Uuid) -> Result<Vec<ProjectAchievement>>;

    /// By title; all programs when `category_id` is `None`.
    async fn list_programs(&self, category_id: Option<Uuid>) -> Result<Vec<Program>>;
    async fn get_program(&self, id: Uuid) -> Result<Option<Program>>;
    async fn insert_program(&self, program: Program) -> Result<Program>;

    /// By name.
    async fn list_schools(&self, limit: i64, offset: i64) -> Result<Vec<School>>;
    async fn count_schools(&self) -> Result<i64>;
    async fn get_school(&self, id: Uuid) -> Result<Option<School>>;
    async fn insert_school(&self, school: School) -> Result<School>;

    /// By title.
    async fn list_clubs(&self, limit: i64, offset: i64) -> Result<Vec<Club>>;
    async fn count_clubs(&self) -> Result<i64>;
    async fn list_clubs_for_school(&self, school_id: Uuid) -> Result<Vec<Club>>;
    async fn get_club(&self, id: Uuid) -> Result<Option<Club>>;
    async fn insert_club(&self, club: Club) -> Result<Club>;

    /// Date desc, then created desc. Drafts only when `include_drafts`.
    async fn list_blog_posts(&self, include_drafts: bool) -> Result<Vec<BlogPost>>;
    async fn get_blog_post(&self, id: Uuid) -> Result<Option<BlogPost>>;
    async fn insert_blog_post(&self, post: BlogPost) -> Result<BlogPost>;
}

/// Read-only showcase content. Admins maintain these rows directly in the
/// store; the site only lists them. `active_*` methods skip inactive rows.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ShowcaseRepository: Send + Sync {
    async fn list_team(&self) -> Result<Vec<TeamMember>>;
    async fn list_voices(&self) -> Result<Vec<VoiceOfChange>>;
    async fn list_mentors(&self, limit: Option<i64>) -> Result<Vec<Mentor>>;
    /// Newest first.
    async fn list_photos(&self, limit: Option<i64>) -> Result<Vec<Photo>>;
    async fn list_resources(&self, limit: Option<i64>) -> Result<Vec<Resource>>;
    async fn list_donations(&self) -> Result<Vec<Donation>>;
    /// By (order, title).
    async fn active_impacts(&self) -> Result<Vec<Impact>>;
    /// By (order, title).
    async fn active_impact_counters(&self) -> Result<Vec<ImpactCounter>>;
    /// By (order, kind).
    async fn active_spotlight_categories(&self) -> Result<Vec<SpotlightCategory>>;
    /// By (order, score desc, title).
    async fn active_spotlight_items(&self, category_id: Uuid) -> Result<Vec<SpotlightItem>>;
    /// By (order, title).
    async fn active_spotlight_stats(&self) -> Result<Vec<SpotlightStat>>;
}

/// Project memberships and join requests.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Fails with `Conflict(AlreadyMember)` when (project, user) already exists.
    async fn insert_membership(&self, membership: Membership) -> Result<Membership>;
    async fn find_membership(&self, project_id: Uuid, user_id: Uuid) -> Result<Option<Membership>>;
    /// Returns `true` when a row was removed.
    async fn delete_membership(&self, project_id: Uuid, user_id: Uuid) -> Result<bool>;
    /// Newest first, with usernames.
    async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>>;
    async fn count_members(&self, project_id: Uuid) -> Result<i64>;

    /// Fails with `Conflict(AlreadyPending)` when a pending request exists.
    async fn insert_request(&self, request: MembershipRequest) -> Result<MembershipRequest>;
    async fn get_request(&self, id: Uuid) -> Result<Option<MembershipRequest>>;
    async fn find_pending_request(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MembershipRequest>>;
    /// Oldest first.
    async fn list_pending_requests(&self, project_id: Uuid) -> Result<Vec<MembershipRequest>>;
    /// Moves a pending request to a terminal `status`. `None` when the request
    /// was missing or no longer pending.
    async fn close_request(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<Option<MembershipRequest>>;
    /// Atomically approves a pending request and creates the membership it
    /// asked for. An existing membership is kept as is and returned.
    async fn approve_request(&self, id: Uuid) -> Result<Option<(MembershipRequest, Membership)>>;
}

/// Member-authored articles.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn insert_article(&self, article: Article) -> Result<Article>;
    async fn get_article(&self, id: Uuid) -> Result<Option<Article>>;
    async fn update_article(&self, article: Article) -> Result<Article>;
    /// Date desc, then created desc.
    async fn list_articles(&self, visibility: Visibility, limit: Option<i64>) -> Result<Vec<Article>>;
}

/// Contact messages and newsletter subscriptions.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IntakeRepository: Send + Sync {
    async fn insert_contact_message(&self, message: ContactMessage) -> Result<ContactMessage>;
    /// Newest first.
    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>>;

    /// Fails with `Conflict(DuplicateActive)` when the email is taken.
    async fn insert_subscription(
        &self,
        subscription: NewsletterSubscription,
    ) -> Result<NewsletterSubscription>;
    async fn find_subscription_by_email(&self, email: &str) -> Result<Option<NewsletterSubscription>>;
    /// Soft delete. `None` when the id is unknown.
    async fn deactivate_subscription(&self, id: Uuid) -> Result<Option<NewsletterSubscription>>;
    /// Newest first.
    async fn list_subscriptions(&self) -> Result<Vec<NewsletterSubscription>>;
}

/// Password hashing contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    /// Verifies a password against a stored hash. Malformed hashes never verify.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// A signed bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Bearer token contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: Uuid) -> Result<IssuedToken>;
    /// Returns the user id the token was issued for.
    fn verify(&self, token: &str) -> Result<Uuid>;
}
