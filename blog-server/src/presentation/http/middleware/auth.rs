use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::domain::user::User;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppError;

/// Principal attached by [`jwt_auth_middleware`]; loaded fresh from storage on every request.
#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) user: User,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized("missing bearer token"))
    }
}

/// Extracts `<token>` from `Authorization: Bearer <token>`. The scheme is
/// case-insensitive; anything other than exactly two parts is rejected.
pub(crate) fn parse_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let mut parts = auth_header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}

pub(crate) async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = parse_bearer_token(request.headers()).ok_or_else(|| {
        debug!(kind = "missing", "access token rejected");
        AppError::Unauthorized("missing bearer token")
    })?;

    let user = state.principals.authenticate(&state.tokens, token).await?;

    request.extensions_mut().insert(AuthenticatedUser { user });
    Ok(next.run(request).await)
}
