use axum::extract::State;
use axum::Json;
use domains::inputs::ArticleInput;
use domains::{Article, BlogPost};
use serde::Serialize;
use services::publication::{article_created_message, article_updated_message};
use services::Outcome;
use uuid::Uuid;

use super::{ApiResult, Reply};
use crate::web::{AppState, CurrentUser, JsonBody, OptionalUser, PathParam};

#[derive(Debug, Serialize)]
pub struct MemberStatus {
    pub is_member: bool,
}

pub async fn list_articles(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
) -> ApiResult<Vec<Article>> {
    Ok(Json(state.publication.list_articles(viewer.as_ref()).await?))
}

pub async fn article_detail(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    OptionalUser(viewer): OptionalUser,
) -> ApiResult<Article> {
    Ok(Json(state.publication.article_detail(id, viewer.as_ref()).await?))
}

pub async fn add_article(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(input): JsonBody<ArticleInput>,
) -> Reply<Article> {
    let result = state.publication.add_article(&user, input).await;
    state.metrics.track("add_article", &result);
    Ok(Json(Outcome::new(article_created_message(), result?)))
}

pub async fn edit_article(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    CurrentUser(user): CurrentUser,
    JsonBody(input): JsonBody<ArticleInput>,
) -> Reply<Article> {
    let result = state.publication.edit_article(id, &user, input).await;
    state.metrics.track("edit_article", &result);
    Ok(Json(Outcome::new(article_updated_message(), result?)))
}

pub async fn become_member(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Reply<MemberStatus> {
    let result = state.publication.become_member(&user).await;
    state.metrics.track("become_member", &result);
    Ok(Json(Outcome::new(result?.message(), MemberStatus { is_member: true })))
}

pub async fn list_blog_posts(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
) -> ApiResult<Vec<BlogPost>> {
    Ok(Json(state.publication.list_blog_posts(viewer.as_ref()).await?))
}

pub async fn blog_post_detail(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    OptionalUser(viewer): OptionalUser,
) -> ApiResult<BlogPost> {
    Ok(Json(state.publication.blog_post_detail(id, viewer.as_ref()).await?))
}
