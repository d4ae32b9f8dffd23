//! # DomainError
//!
//! Centralized error handling for the YCBN site.
//! Every variant is recoverable at the request boundary: it is turned into a
//! user-visible message and never takes the process down.

use serde::Serialize;
use thiserror::Error;

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The duplicate a `Conflict` refers to.
///
/// Storage adapters report uniqueness violations with the matching kind, so a
/// lost race looks exactly like a pre-existing row to the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// A membership already exists for (project, user)
    AlreadyMember,
    /// A pending join request already exists for (project, user)
    AlreadyPending,
    /// An active newsletter subscription already uses this email
    DuplicateActive,
    /// The email belongs to a deactivated subscription
    InactiveSubscription,
    /// The join request was already approved, rejected or cancelled
    RequestNotPending,
    UsernameTaken,
    /// Unique name collision on a catalog row (e.g. category name)
    DuplicateName,
}

impl ConflictKind {
    pub fn message(&self) -> &'static str {
        match self {
            ConflictKind::AlreadyMember => "You are already a member of this project.",
            ConflictKind::AlreadyPending => {
                "You already have a pending request to join this project."
            }
            ConflictKind::DuplicateActive => "This email is already subscribed to our newsletter.",
            ConflictKind::InactiveSubscription => {
                "This email belongs to a cancelled subscription. Please contact us to resubscribe."
            }
            ConflictKind::RequestNotPending => "This join request has already been processed.",
            ConflictKind::UsernameTaken => "A user with that username already exists.",
            ConflictKind::DuplicateName => "An entry with this name already exists.",
        }
    }
}

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Resource not found (e.g., Project, Article, MembershipRequest)
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    /// Capability or ownership check failed
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Duplicate membership, request, subscription or account
    #[error("conflict: {}", .0.message())]
    Conflict(ConflictKind),

    /// Missing or malformed required fields
    #[error("validation error: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// Missing or invalid credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Infrastructure failure (e.g., DB down)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound(entity, id.to_string())
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation(vec![FieldError::new(field, message)])
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A specialized Result type for domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;
