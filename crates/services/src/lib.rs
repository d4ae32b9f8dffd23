//! # Services
//!
//! Business workflows of the YCBN site. Each service owns the port trait
//! objects it needs and never touches storage or HTTP types directly.

pub mod accounts;
pub mod catalog;
pub mod contact;
pub mod membership;
pub mod newsletter;
pub mod pagination;
pub mod publication;
pub mod status;

pub use accounts::{AccountsService, Profile, Session};
pub use catalog::CatalogService;
pub use contact::ContactService;
pub use membership::{JoinOutcome, LeaveOutcome, MembershipService};
pub use newsletter::NewsletterService;
pub use pagination::{Page, PageWindow};
pub use publication::{MemberGrant, PublicationService};
pub use status::{Level, Outcome, StatusMessage};

use domains::{DomainError, Result, User};

/// Staff-only operations call this first.
pub(crate) fn require_staff(user: &User, reason: &str) -> Result<()> {
    if user.is_staff {
        Ok(())
    } else {
        Err(DomainError::Forbidden(reason.to_string()))
    }
}
