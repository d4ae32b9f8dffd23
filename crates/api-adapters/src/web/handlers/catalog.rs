use axum::extract::{Query, State};
use axum::Json;
use domains::{Club, Donation, Mentor, Photo, Resource, TeamMember, VoiceOfChange};
use serde::Deserialize;
use services::catalog::{
    CategoryPrograms, ClubPage, HomePage, ImpactPage, ProgramPage, ProjectCard, ProjectPage,
    SchoolCard, SchoolPage, SpotlightPage,
};
use services::Page;
use uuid::Uuid;

use super::{ApiResult, PageQuery};
use crate::web::{AppState, OptionalUser, PathParam};

#[derive(Debug, Default, Deserialize)]
pub struct ProgramQuery {
    pub category: Option<String>,
}

pub async fn home(State(state): State<AppState>) -> ApiResult<HomePage> {
    Ok(Json(state.catalog.home().await?))
}

pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Page<ProjectCard>> {
    Ok(Json(state.catalog.list_projects(query.page.as_deref()).await?))
}

pub async fn project_detail(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    OptionalUser(viewer): OptionalUser,
) -> ApiResult<ProjectPage> {
    Ok(Json(state.catalog.project_detail(id, viewer.as_ref()).await?))
}

pub async fn list_clubs(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Page<Club>> {
    Ok(Json(state.catalog.list_clubs(query.page.as_deref()).await?))
}

pub async fn club_detail(State(state): State<AppState>, PathParam(id): PathParam<Uuid>) -> ApiResult<ClubPage> {
    Ok(Json(state.catalog.club_detail(id).await?))
}

pub async fn list_programs(
    State(state): State<AppState>,
    Query(query): Query<ProgramQuery>,
) -> ApiResult<Vec<CategoryPrograms>> {
    Ok(Json(state.catalog.list_programs(query.category.as_deref()).await?))
}

pub async fn program_detail(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<ProgramPage> {
    Ok(Json(state.catalog.program_detail(id).await?))
}

pub async fn list_schools(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Page<SchoolCard>> {
    Ok(Json(state.catalog.list_schools(query.page.as_deref()).await?))
}

pub async fn school_detail(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<SchoolPage> {
    Ok(Json(state.catalog.school_detail(id).await?))
}

pub async fn impact(State(state): State<AppState>) -> ApiResult<ImpactPage> {
    Ok(Json(state.catalog.impact().await?))
}

pub async fn spotlight(State(state): State<AppState>) -> ApiResult<SpotlightPage> {
    Ok(Json(state.catalog.spotlight().await?))
}

pub async fn donations(State(state): State<AppState>) -> ApiResult<Vec<Donation>> {
    Ok(Json(state.catalog.donations().await?))
}

pub async fn resources(State(state): State<AppState>) -> ApiResult<Vec<Resource>> {
    Ok(Json(state.catalog.resources().await?))
}

pub async fn gallery(State(state): State<AppState>) -> ApiResult<Vec<Photo>> {
    Ok(Json(state.catalog.gallery().await?))
}

pub async fn team(State(state): State<AppState>) -> ApiResult<Vec<TeamMember>> {
    Ok(Json(state.catalog.team().await?))
}

pub async fn mentors(State(state): State<AppState>) -> ApiResult<Vec<Mentor>> {
    Ok(Json(state.catalog.mentors().await?))
}

pub async fn testimonials(State(state): State<AppState>) -> ApiResult<Vec<VoiceOfChange>> {
    Ok(Json(state.catalog.testimonials().await?))
}
