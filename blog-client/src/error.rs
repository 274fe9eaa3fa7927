use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `blog-client`.
pub enum BlogClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется авторизация (отсутствует, истёк или некорректен токен).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Недостаточно прав: нужна роль ADMIN или авторство поста.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Запрошенный ресурс не найден.
    #[error("not found: {0}")]
    NotFound(String),

    /// Некорректный запрос, ошибка валидации или конфликт.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Результат операций `blog-client`.
pub type BlogClientResult<T> = Result<T, BlogClientError>;

/// Тело ошибки сервера: `{ "error": ..., "type": ... }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: Option<String>,
    #[serde(rename = "type")]
    pub(crate) kind: Option<String>,
}

impl BlogClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, body: Option<ErrorBody>) -> Self {
        let message = match body {
            Some(ErrorBody {
                error: Some(error),
                kind: Some(kind),
            }) => format!("{kind}: {error}"),
            Some(ErrorBody {
                error: Some(error), ..
            }) => error,
            _ => format!("http status {status}"),
        };

        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden(message),
            reqwest::StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::InvalidRequest(message),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{BlogClientError, ErrorBody};
    use reqwest::StatusCode;

    fn body(error: &str, kind: &str) -> Option<ErrorBody> {
        Some(ErrorBody {
            error: Some(error.to_string()),
            kind: Some(kind.to_string()),
        })
    }

    #[test]
    fn maps_statuses_to_variants() {
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::UNAUTHORIZED, None),
            BlogClientError::Unauthorized(_)
        ));
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::FORBIDDEN, None),
            BlogClientError::Forbidden(_)
        ));
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::NOT_FOUND, None),
            BlogClientError::NotFound(_)
        ));
        assert!(matches!(
            BlogClientError::from_http_status(StatusCode::BAD_REQUEST, None),
            BlogClientError::InvalidRequest(_)
        ));
    }

    #[test]
    fn keeps_server_message_and_kind() {
        let err = BlogClientError::from_http_status(
            StatusCode::BAD_REQUEST,
            body("resource already exists: email", "ConflictError"),
        );
        match err {
            BlogClientError::InvalidRequest(message) => {
                assert_eq!(message, "ConflictError: resource already exists: email")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
