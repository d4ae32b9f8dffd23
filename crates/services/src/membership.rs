//! # Membership Workflow
//!
//! Joining and leaving projects, plus the reviewed join-request lifecycle:
//!
//! ```text
//! pending ──approve──▶ approved (membership created)
//!    │ ────reject───▶ rejected
//!    └─────cancel───▶ cancelled (owner only)
//! ```
//!
//! A deployment offers one self-service path, picked by [`JoinPolicy`].
//! `leave` and the staff review actions work under both policies.

use std::sync::Arc;

use domains::inputs::{self, JoinInput, JoinRequestInput};
use domains::ports::{CatalogRepository, MembershipRepository};
use domains::{
    ConflictKind, DomainError, JoinPolicy, Membership, MembershipRequest, Project, ProjectRole,
    RequestStatus, Result, User,
};
use uuid::Uuid;

use crate::require_staff;
use crate::status::StatusMessage;

#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    Joined(Membership),
    /// The existing row, untouched
    AlreadyMember(Membership),
}

impl JoinOutcome {
    pub fn membership(&self) -> &Membership {
        match self {
            JoinOutcome::Joined(m) | JoinOutcome::AlreadyMember(m) => m,
        }
    }

    pub fn message(&self) -> StatusMessage {
        match self {
            JoinOutcome::Joined(_) => StatusMessage::success("You have joined this project."),
            JoinOutcome::AlreadyMember(_) => {
                StatusMessage::info(ConflictKind::AlreadyMember.message())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left,
    NotAMember,
}

impl LeaveOutcome {
    pub fn message(&self) -> StatusMessage {
        match self {
            LeaveOutcome::Left => StatusMessage::success("You have left this project."),
            LeaveOutcome::NotAMember => StatusMessage::info("You were not a member of this project."),
        }
    }
}

pub struct MembershipService {
    catalog: Arc<dyn CatalogRepository>,
    memberships: Arc<dyn MembershipRepository>,
    policy: JoinPolicy,
}

impl MembershipService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        memberships: Arc<dyn MembershipRepository>,
        policy: JoinPolicy,
    ) -> Self {
        Self {
            catalog,
            memberships,
            policy,
        }
    }

    pub fn policy(&self) -> JoinPolicy {
        self.policy
    }

    async fn require_project(&self, project_id: Uuid) -> Result<Project> {
        self.catalog
            .get_project(project_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Project", project_id))
    }

    /// Creates a membership, or reports the one that already exists.
    pub async fn join(&self, project_id: Uuid, user: &User, input: JoinInput) -> Result<JoinOutcome> {
        if self.policy == JoinPolicy::Review && !user.is_staff {
            return Err(DomainError::Forbidden(
                "Projects are joined by request. Please submit a join request.".into(),
            ));
        }
        let role = parse_role(&input.role)?;
        self.require_project(project_id).await?;

        if let Some(existing) = self.memberships.find_membership(project_id, user.id).await? {
            return Ok(JoinOutcome::AlreadyMember(existing));
        }

        match self
            .memberships
            .insert_membership(Membership::new(project_id, user.id, role))
            .await
        {
            Ok(membership) => {
                tracing::info!(project_id = %project_id, user_id = %user.id, role = %role, "joined project");
                Ok(JoinOutcome::Joined(membership))
            }
            // Lost a race against a concurrent join
            Err(DomainError::Conflict(ConflictKind::AlreadyMember)) => self
                .memberships
                .find_membership(project_id, user.id)
                .await?
                .map(JoinOutcome::AlreadyMember)
                .ok_or_else(|| {
                    DomainError::Internal("membership vanished after a uniqueness conflict".into())
                }),
            Err(e) => Err(e),
        }
    }

    pub async fn leave(&self, project_id: Uuid, user: &User) -> Result<LeaveOutcome> {
        self.require_project(project_id).await?;
        if self.memberships.delete_membership(project_id, user.id).await? {
            tracing::info!(project_id = %project_id, user_id = %user.id, "left project");
            Ok(LeaveOutcome::Left)
        } else {
            Ok(LeaveOutcome::NotAMember)
        }
    }

    /// Files a pending request for staff review.
    pub async fn request_join(
        &self,
        project_id: Uuid,
        user: &User,
        input: JoinRequestInput,
    ) -> Result<MembershipRequest> {
        self.require_review_policy()?;
        inputs::validate(&input)?;
        let role = parse_role(&input.role)?;
        self.require_project(project_id).await?;

        if self
            .memberships
            .find_pending_request(project_id, user.id)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(ConflictKind::AlreadyPending));
        }
        if self
            .memberships
            .find_membership(project_id, user.id)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(ConflictKind::AlreadyMember));
        }

        let request = MembershipRequest::pending(project_id, user.id, role, inputs::text(&input.message));
        let request = self.memberships.insert_request(request).await?;
        tracing::info!(
            project_id = %project_id,
            user_id = %user.id,
            request_id = %request.id,
            "join request submitted"
        );
        Ok(request)
    }

    /// Only the owner may cancel, and only while the request is pending.
    /// Every other case is reported as not found.
    pub async fn cancel_request(&self, request_id: Uuid, user: &User) -> Result<MembershipRequest> {
        self.require_review_policy()?;
        let not_found = || DomainError::not_found("MembershipRequest", request_id);

        let request = self
            .memberships
            .get_request(request_id)
            .await?
            .filter(|r| r.user_id == user.id && r.is_pending())
            .ok_or_else(not_found)?;

        let cancelled = self
            .memberships
            .close_request(request.id, RequestStatus::Cancelled)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(request_id = %request_id, user_id = %user.id, "join request cancelled");
        Ok(cancelled)
    }

    pub async fn approve_request(
        &self,
        request_id: Uuid,
        staff: &User,
    ) -> Result<(MembershipRequest, Membership)> {
        require_staff(staff, "Only staff can review join requests.")?;
        self.require_pending(request_id).await?;

        let (request, membership) = self
            .memberships
            .approve_request(request_id)
            .await?
            .ok_or(DomainError::Conflict(ConflictKind::RequestNotPending))?;
        tracing::info!(
            request_id = %request_id,
            project_id = %request.project_id,
            user_id = %request.user_id,
            reviewer_id = %staff.id,
            "join request approved"
        );
        Ok((request, membership))
    }

    pub async fn reject_request(&self, request_id: Uuid, staff: &User) -> Result<MembershipRequest> {
        require_staff(staff, "Only staff can review join requests.")?;
        self.require_pending(request_id).await?;

        let request = self
            .memberships
            .close_request(request_id, RequestStatus::Rejected)
            .await?
            .ok_or(DomainError::Conflict(ConflictKind::RequestNotPending))?;
        tracing::info!(request_id = %request_id, reviewer_id = %staff.id, "join request rejected");
        Ok(request)
    }

    pub async fn list_pending_requests(
        &self,
        project_id: Uuid,
        staff: &User,
    ) -> Result<Vec<MembershipRequest>> {
        require_staff(staff, "Only staff can review join requests.")?;
        self.require_project(project_id).await?;
        self.memberships.list_pending_requests(project_id).await
    }

    fn require_review_policy(&self) -> Result<()> {
        if self.policy == JoinPolicy::Direct {
            return Err(DomainError::Forbidden(
                "Join requests are not enabled. You can join projects directly.".into(),
            ));
        }
        Ok(())
    }

    async fn require_pending(&self, request_id: Uuid) -> Result<MembershipRequest> {
        let request = self
            .memberships
            .get_request(request_id)
            .await?
            .ok_or_else(|| DomainError::not_found("MembershipRequest", request_id))?;
        if !request.is_pending() {
            return Err(DomainError::Conflict(ConflictKind::RequestNotPending));
        }
        Ok(request)
    }
}

/// Missing or blank roles default to student.
fn parse_role(raw: &Option<String>) -> Result<ProjectRole> {
    match inputs::optional(raw) {
        None => Ok(ProjectRole::default()),
        Some(value) => value.parse().map_err(|_| {
            DomainError::invalid(
                "role",
                format!("Select a valid choice. {value} is not one of the available choices."),
            )
        }),
    }
}

pub fn request_submitted_message() -> StatusMessage {
    StatusMessage::success("Your request to join this project has been submitted for review.")
}

pub fn request_cancelled_message() -> StatusMessage {
    StatusMessage::success("Your join request has been cancelled.")
}

pub fn request_approved_message() -> StatusMessage {
    StatusMessage::success("The join request has been approved.")
}

pub fn request_rejected_message() -> StatusMessage {
    StatusMessage::success("The join request has been rejected.")
}
