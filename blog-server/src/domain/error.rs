use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}

impl DomainError {
    /// Stable name of the error class, exposed to API clients next to the message.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "ValidationError",
            DomainError::NotFound(_) => "NotFoundError",
            DomainError::AlreadyExists(_) => "ConflictError",
            DomainError::Forbidden(_) => "AuthorizationError",
            DomainError::InvalidCredentials => "AuthenticationError",
            DomainError::InvalidToken(_) => "InvalidTokenError",
            DomainError::Unexpected(_) => "InternalError",
        }
    }
}
