pub mod accounts;
pub mod catalog;
pub mod intake;
pub mod membership;
pub mod publication;
pub mod staff;
pub mod system;

use axum::Json;
use serde::Deserialize;
use services::Outcome;

use super::ApiError;

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Mutation response body.
pub type Reply<T> = ApiResult<Outcome<T>>;

/// `?page=`; kept as raw text so a non-integer value falls back to page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}
