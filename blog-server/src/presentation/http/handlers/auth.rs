use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::user::{LoginRequest, RegisterRequest, SetRoleRequest, User, UserRole};
use crate::infrastructure::jwt::TokenPair;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::{AuthenticatedUser, parse_bearer_token};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RegisterDto {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email, length(max = 255))]
    pub(crate) email: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
    #[validate(length(max = 255))]
    pub(crate) full_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) email: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct RefreshDto {
    pub(crate) refresh_token: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum RoleDto {
    User,
    Admin,
}

impl From<RoleDto> for UserRole {
    fn from(role: RoleDto) -> Self {
        match role {
            RoleDto::User => UserRole::User,
            RoleDto::Admin => UserRole::Admin,
        }
    }
}

impl From<UserRole> for RoleDto {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::User => RoleDto::User,
            UserRole::Admin => RoleDto::Admin,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct SetRoleDto {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email)]
    pub(crate) user_email: String,
    pub(crate) role: RoleDto,
}

fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|value| value.trim().to_string())
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct TokenPairDto {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
}

impl From<TokenPair> for TokenPairDto {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct MeDto {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) full_name: Option<String>,
    pub(crate) role: RoleDto,
}

impl From<User> for MeDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role.into(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Registered successfully", body = TokenPairDto),
        (status = 400, description = "Validation error or email already registered"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(dto): Json<RegisterDto>,
) -> AppResult<(StatusCode, Json<TokenPairDto>)> {
    dto.validate()?;

    let req = RegisterRequest {
        email: dto.email,
        full_name: dto.full_name,
        password: dto.password,
    };

    let tokens = state.auth_service.register(req).await?;

    Ok((StatusCode::CREATED, Json(tokens.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = TokenPairDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Unknown email"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> AppResult<(StatusCode, Json<TokenPairDto>)> {
    dto.validate()?;

    let req = LoginRequest {
        email: dto.email,
        password: dto.password,
    };

    let tokens = state.auth_service.login(req).await?;

    Ok((StatusCode::OK, Json(tokens.into())))
}

/// The refresh token may come as a bearer header, in the JSON body, or both.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    request_body(content = RefreshDto, description = "Fallback when no bearer header is sent"),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "New token pair", body = TokenPairDto),
        (status = 401, description = "Missing, expired or invalid refresh token"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<(StatusCode, Json<TokenPairDto>)> {
    let body_token = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<RefreshDto>(&body)
            .inspect_err(|err| debug!(error = %err, "ignoring unreadable refresh body"))
            .ok()
            .map(|dto| dto.refresh_token)
    };

    let tokens = state
        .auth_service
        .refresh(parse_bearer_token(&headers), body_token.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(tokens.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current user", body = MeDto),
        (status = 401, description = "Invalid token"),
        (status = 404, description = "Token owner no longer exists")
    )
)]
pub(crate) async fn me(auth: AuthenticatedUser) -> AppResult<Json<MeDto>> {
    Ok(Json(auth.user.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/set-role",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    request_body = SetRoleDto,
    responses(
        (status = 204, description = "Role changed"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Target user not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn set_role(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<SetRoleDto>,
) -> AppResult<StatusCode> {
    dto.validate()?;

    let req = SetRoleRequest {
        user_email: dto.user_email,
        role: dto.role.into(),
    };
    state.auth_service.set_role(&auth.user, req).await?;

    Ok(StatusCode::NO_CONTENT)
}
