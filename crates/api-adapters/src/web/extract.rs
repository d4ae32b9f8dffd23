//! Request extractors. The bearer token is resolved to a fresh `User` on
//! every request, so capability and staff flags are never stale.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, OptionalFromRequest, Path, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use domains::{DomainError, User};

use super::{ApiError, AppState};

/// A signed-in user. Rejects the request with 401 otherwise.
pub struct CurrentUser(pub User);

/// The signed-in user, if any. A malformed or expired token is still a 401.
pub struct OptionalUser(pub Option<User>);

fn bearer(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| Some(token.trim()))
        .ok_or_else(|| DomainError::Unauthorized("Malformed authorization header.".into()).into())
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer(parts)? {
            Some(token) => Ok(OptionalUser(Some(state.accounts.authenticate(token).await?))),
            None => Ok(OptionalUser(None)),
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let OptionalUser(user) = OptionalUser::from_request_parts(parts, state).await?;
        user.map(CurrentUser).ok_or_else(|| {
            DomainError::Unauthorized("Authentication credentials were not provided.".into()).into()
        })
    }
}

/// A JSON request body whose rejections use the API error shape.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// `Option<JsonBody<T>>` is `None` when the request carries no JSON content type.
impl<S, T> OptionalFromRequest<S> for JsonBody<T>
where
    Json<T>: OptionalFromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let body = <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await?;
        Ok(body.map(|Json(value)| JsonBody(value)))
    }
}

/// Path parameters whose rejections use the API error shape.
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = <Path<T> as FromRequestParts<S>>::from_request_parts(parts, state).await?;
        Ok(PathParam(value))
    }
}
