//! Staff-only endpoints. The services reject non-staff callers with 403.

use axum::extract::State;
use axum::Json;
use domains::inputs::{BlogPostInput, CategoryInput, ClubInput, ProgramInput, ProjectInput, SchoolInput};
use domains::*;
use serde::Serialize;
use services::catalog::{created_message, project_deleted_message};
use services::membership::{request_approved_message, request_rejected_message};
use services::newsletter::deactivated_message;
use services::Outcome;
use uuid::Uuid;

use super::{ApiResult, Reply};
use crate::web::{AppState, CurrentUser, JsonBody, PathParam};

#[derive(Debug, Serialize)]
pub struct Approval {
    pub request: MembershipRequest,
    pub membership: Membership,
}

pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(staff): CurrentUser,
    JsonBody(input): JsonBody<CategoryInput>,
) -> Reply<Category> {
    let category = state.catalog.create_category(&staff, input).await?;
    Ok(Json(Outcome::new(created_message("Category"), category)))
}

pub async fn create_project(
    State(state): State<AppState>,
    CurrentUser(staff): CurrentUser,
    JsonBody(input): JsonBody<ProjectInput>,
) -> Reply<Project> {
    let project = state.catalog.create_project(&staff, input).await?;
    Ok(Json(Outcome::new(created_message("Project"), project)))
}

pub async fn delete_project(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    CurrentUser(staff): CurrentUser,
) -> Reply<()> {
    let result = state.catalog.delete_project(&staff, id).await;
    state.metrics.track("delete_project", &result);
    result?;
    Ok(Json(Outcome::new(project_deleted_message(), ())))
}

pub async fn create_program(
    State(state): State<AppState>,
    CurrentUser(staff): CurrentUser,
    JsonBody(input): JsonBody<ProgramInput>,
) -> Reply<Program> {
    let program = state.catalog.create_program(&staff, input).await?;
    Ok(Json(Outcome::new(created_message("Program"), program)))
}

pub async fn create_school(
    State(state): State<AppState>,
    CurrentUser(staff): CurrentUser,
    JsonBody(input): JsonBody<SchoolInput>,
) -> Reply<School> {
    let school = state.catalog.create_school(&staff, input).await?;
    Ok(Json(Outcome::new(created_message("School"), school)))
}

pub async fn create_club(
    State(state): State<AppState>,
    CurrentUser(staff): CurrentUser,
    JsonBody(input): JsonBody<ClubInput>,
) -> Reply<Club> {
    let club = state.catalog.create_club(&staff, input).await?;
    Ok(Json(Outcome::new(created_message("Club"), club)))
}

pub async fn create_blog_post(
    State(state): State<AppState>,
    CurrentUser(staff): CurrentUser,
    JsonBody(input): JsonBody<BlogPostInput>,
) -> Reply<BlogPost> {
    let post = state.publication.create_blog_post(&staff, input).await?;
    Ok(Json(Outcome::new(created_message("Blog post"), post)))
}

pub async fn pending_requests(
    State(state): State<AppState>,
    PathParam(project_id): PathParam<Uuid>,
    CurrentUser(staff): CurrentUser,
) -> ApiResult<Vec<MembershipRequest>> {
    Ok(Json(state.membership.list_pending_requests(project_id, &staff).await?))
}

pub async fn approve_request(
    State(state): State<AppState>,
    PathParam(request_id): PathParam<Uuid>,
    CurrentUser(staff): CurrentUser,
) -> Reply<Approval> {
    let result = state.membership.approve_request(request_id, &staff).await;
    state.metrics.track("approve_request", &result);
    let (request, membership) = result?;
    Ok(Json(Outcome::new(
        request_approved_message(),
        Approval { request, membership },
    )))
}

pub async fn reject_request(
    State(state): State<AppState>,
    PathParam(request_id): PathParam<Uuid>,
    CurrentUser(staff): CurrentUser,
) -> Reply<MembershipRequest> {
    let result = state.membership.reject_request(request_id, &staff).await;
    state.metrics.track("reject_request", &result);
    Ok(Json(Outcome::new(request_rejected_message(), result?)))
}

pub async fn subscriptions(
    State(state): State<AppState>,
    CurrentUser(staff): CurrentUser,
) -> ApiResult<Vec<NewsletterSubscription>> {
    Ok(Json(state.newsletter.list_subscriptions(&staff).await?))
}

pub async fn deactivate_subscription(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    CurrentUser(staff): CurrentUser,
) -> Reply<NewsletterSubscription> {
    let result = state.newsletter.deactivate(id, &staff).await;
    state.metrics.track("deactivate_subscription", &result);
    Ok(Json(Outcome::new(deactivated_message(), result?)))
}

pub async fn contact_messages(
    State(state): State<AppState>,
    CurrentUser(staff): CurrentUser,
) -> ApiResult<Vec<ContactMessage>> {
    Ok(Json(state.contact.list_messages(&staff).await?))
}
