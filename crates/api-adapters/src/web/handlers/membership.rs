use axum::extract::State;
use axum::Json;
use domains::inputs::{JoinInput, JoinRequestInput};
use domains::{Membership, MembershipRequest};
use services::membership::{request_cancelled_message, request_submitted_message};
use services::Outcome;
use uuid::Uuid;

use super::Reply;
use crate::web::{AppState, CurrentUser, JsonBody, PathParam};

/// The body is optional; the role defaults to student.
pub async fn join(
    State(state): State<AppState>,
    PathParam(project_id): PathParam<Uuid>,
    CurrentUser(user): CurrentUser,
    body: Option<JsonBody<JoinInput>>,
) -> Reply<Membership> {
    let input = body.map(|JsonBody(input)| input).unwrap_or_default();
    let result = state.membership.join(project_id, &user, input).await;
    state.metrics.track("join", &result);
    let outcome = result?;
    Ok(Json(Outcome::new(outcome.message(), outcome.membership().clone())))
}

pub async fn leave(
    State(state): State<AppState>,
    PathParam(project_id): PathParam<Uuid>,
    CurrentUser(user): CurrentUser,
) -> Reply<()> {
    let result = state.membership.leave(project_id, &user).await;
    state.metrics.track("leave", &result);
    Ok(Json(Outcome::new(result?.message(), ())))
}

pub async fn request_join(
    State(state): State<AppState>,
    PathParam(project_id): PathParam<Uuid>,
    CurrentUser(user): CurrentUser,
    body: Option<JsonBody<JoinRequestInput>>,
) -> Reply<MembershipRequest> {
    let input = body.map(|JsonBody(input)| input).unwrap_or_default();
    let result = state.membership.request_join(project_id, &user, input).await;
    state.metrics.track("request_join", &result);
    Ok(Json(Outcome::new(request_submitted_message(), result?)))
}

pub async fn cancel_request(
    State(state): State<AppState>,
    PathParam(request_id): PathParam<Uuid>,
    CurrentUser(user): CurrentUser,
) -> Reply<MembershipRequest> {
    let result = state.membership.cancel_request(request_id, &user).await;
    state.metrics.track("cancel_request", &result);
    Ok(Json(Outcome::new(request_cancelled_message(), result?)))
}
