use axum::extract::State;
use axum::Json;
use domains::inputs::{LoginInput, RegisterInput};
use services::accounts::registered_message;
use services::{Outcome, Profile, Session, StatusMessage};

use super::{ApiResult, Reply};
use crate::web::{AppState, CurrentUser, JsonBody};

pub async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RegisterInput>,
) -> Reply<Session> {
    let result = state.accounts.register(input).await;
    state.metrics.track("register", &result);
    Ok(Json(Outcome::new(registered_message(), result?)))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginInput>,
) -> Reply<Session> {
    let result = state.accounts.login(input).await;
    state.metrics.track("login", &result);
    let session = result?;
    let greeting = StatusMessage::success(format!("Welcome back, {}!", session.user.display_name()));
    Ok(Json(Outcome::new(greeting, session)))
}

pub async fn profile(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> ApiResult<Profile> {
    Ok(Json(state.accounts.profile(&user)))
}
