use crate::domain::error::DomainError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        let (status, kind, message) = match self {
            AppError::Domain(err) => {
                let status = match err {
                    DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
                    DomainError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
                    DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                    DomainError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
                    DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
                    DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                    DomainError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = match err {
                    DomainError::Unexpected(_) => "internal error".to_string(),
                    _ => err.to_string(),
                };
                (status, err.kind(), message)
            }
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, "ValidationError", err.to_string()),
            AppError::Unauthorized(reason) => (
                StatusCode::UNAUTHORIZED,
                "InvalidTokenError",
                format!("invalid token: {reason}"),
            ),
        };

        (
            status,
            ErrorBody {
                error: message,
                kind,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Domain(DomainError::Unexpected(detail)) = &self {
            error!(%detail, "request failed");
        }
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
