use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::category::{Category, CategoryPatch, CreateCategoryRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CategoryInputDto {
    #[validate(length(min = 1, max = 150))]
    pub(crate) name: String,
    #[validate(length(min = 1, max = 150))]
    pub(crate) slug: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub(crate) struct PatchCategoryDto {
    #[validate(length(min = 1, max = 150))]
    pub(crate) name: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub(crate) slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub(crate) struct CategoryDto {
    pub(crate) slug: String,
    pub(crate) name: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            slug: category.slug,
            name: category.name,
        }
    }
}

impl From<CategoryInputDto> for CreateCategoryRequest {
    fn from(dto: CategoryInputDto) -> Self {
        Self {
            name: dto.name,
            slug: dto.slug,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories ordered by slug", body = [CategoryDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryDto>>> {
    let categories = state.category_service.list_categories().await?;
    Ok(Json(categories.into_iter().map(CategoryDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{slug}",
    tag = "categories",
    params(
        ("slug" = String, Path, description = "Category slug, normalized before lookup")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryDto),
        (status = 404, description = "Category not found")
    )
)]
pub(crate) async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<CategoryDto>> {
    let category = state.category_service.get_category(&slug).await?;
    Ok(Json(category.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "categories",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CategoryInputDto,
    responses(
        (status = 201, description = "Category created", body = CategoryDto),
        (status = 400, description = "Validation error or duplicate slug"),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub(crate) async fn create_category(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CategoryInputDto>,
) -> AppResult<(StatusCode, Json<CategoryDto>)> {
    dto.validate()?;

    let category = state
        .category_service
        .create_category(&auth.user, dto.into())
        .await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{slug}",
    tag = "categories",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("slug" = String, Path, description = "Current category slug")
    ),
    request_body = CategoryInputDto,
    responses(
        (status = 200, description = "Category replaced", body = CategoryDto),
        (status = 400, description = "Validation error or duplicate slug"),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Category not found")
    )
)]
pub(crate) async fn update_category(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(slug): Path<String>,
    Json(dto): Json<CategoryInputDto>,
) -> AppResult<Json<CategoryDto>> {
    dto.validate()?;

    let patch = CategoryPatch::from(CreateCategoryRequest::from(dto));
    let category = state
        .category_service
        .update_category(&auth.user, &slug, patch)
        .await?;
    Ok(Json(category.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/categories/{slug}",
    tag = "categories",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("slug" = String, Path, description = "Current category slug")
    ),
    request_body = PatchCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = CategoryDto),
        (status = 400, description = "Validation error or duplicate slug"),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Category not found")
    )
)]
pub(crate) async fn patch_category(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(slug): Path<String>,
    Json(dto): Json<PatchCategoryDto>,
) -> AppResult<Json<CategoryDto>> {
    dto.validate()?;

    let patch = CategoryPatch {
        name: dto.name,
        slug: dto.slug,
    };
    let category = state
        .category_service
        .update_category(&auth.user, &slug, patch)
        .await?;
    Ok(Json(category.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{slug}",
    tag = "categories",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Category not found")
    )
)]
pub(crate) async fn delete_category(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    state
        .category_service
        .delete_category(&auth.user, &slug)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
