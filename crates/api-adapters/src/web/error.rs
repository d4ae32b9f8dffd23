//! Maps `DomainError` onto HTTP status codes and a JSON body shaped like the
//! status messages of successful mutations.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::{ConflictKind, DomainError, FieldError};
use serde::Serialize;
use services::StatusMessage;
use thiserror::Error;

const INTERNAL: &str = "Something went wrong on our side. Please try again later.";
const INVALID_FORM: &str = "Please correct the errors below.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("malformed request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("malformed path parameter: {0}")]
    Path(#[from] PathRejection),

    #[error("metrics encoding failed")]
    Metrics(#[from] std::fmt::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: StatusMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflict: Option<ConflictKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

impl ErrorBody {
    fn text(text: impl Into<String>) -> Self {
        Self {
            message: StatusMessage::error(text),
            conflict: None,
            fields: Vec::new(),
        }
    }
}

impl ApiError {
    fn parts(self) -> (StatusCode, ErrorBody) {
        match self {
            ApiError::Domain(err) => match err {
                DomainError::NotFound(entity, _) => (
                    StatusCode::NOT_FOUND,
                    ErrorBody::text(format!("{entity} not found.")),
                ),
                DomainError::Forbidden(reason) => (StatusCode::FORBIDDEN, ErrorBody::text(reason)),
                DomainError::Conflict(kind) => (
                    StatusCode::CONFLICT,
                    ErrorBody {
                        conflict: Some(kind),
                        ..ErrorBody::text(kind.message())
                    },
                ),
                DomainError::Validation(fields) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorBody {
                        fields,
                        ..ErrorBody::text(INVALID_FORM)
                    },
                ),
                DomainError::Unauthorized(reason) => {
                    (StatusCode::UNAUTHORIZED, ErrorBody::text(reason))
                }
                DomainError::Internal(detail) => {
                    tracing::error!(error = %detail, "request failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::text(INTERNAL))
                }
            },
            ApiError::Body(rejection) => (rejection.status(), ErrorBody::text(rejection.body_text())),
            ApiError::Path(rejection) => (rejection.status(), ErrorBody::text(rejection.body_text())),
            ApiError::Metrics(err) => {
                tracing::error!(error = %err, "metrics encoding failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::text(INTERNAL))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_kind() {
        let cases = [
            (DomainError::not_found("Project", 1), StatusCode::NOT_FOUND),
            (DomainError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (DomainError::Conflict(ConflictKind::AlreadyPending), StatusCode::CONFLICT),
            (DomainError::invalid("title", "required"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::Unauthorized("who?".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Internal("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).parts().0, status);
        }
    }

    #[test]
    fn internal_details_stay_out_of_the_body() {
        let (_, body) = ApiError::from(DomainError::Internal("password=hunter2".into())).parts();
        assert_eq!(body.message.text, INTERNAL);
    }

    #[test]
    fn validation_lists_fields() {
        let (_, body) = ApiError::from(DomainError::invalid("email", "Enter a valid email address.")).parts();
        assert_eq!(body.fields.len(), 1);
        assert_eq!(body.fields[0].field, "email");
    }
}
