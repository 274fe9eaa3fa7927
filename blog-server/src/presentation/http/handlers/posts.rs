use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::categories::CategoryDto;
use crate::application::blog_service::ListPostsResult;
use crate::domain::post::{CreatePostRequest, Post, PostPatch, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(max = 255))]
    pub(crate) slug: Option<String>,
    #[validate(length(min = 1))]
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) categories: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) categories: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub(crate) struct PatchPostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: Option<String>,
    #[validate(length(min = 1))]
    pub(crate) content: Option<String>,
    pub(crate) categories: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct PaginationQuery {
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) content: String,
    /// Author email.
    pub(crate) author: String,
    pub(crate) author_id: i64,
    pub(crate) categories: Vec<CategoryDto>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ListPostsResponseDto {
    pub(crate) posts: Vec<PostDto>,
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) total: i64,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            author: post.author_email,
            author_id: post.author_id,
            categories: post.categories.into_iter().map(CategoryDto::from).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<ListPostsResult> for ListPostsResponseDto {
    fn from(result: ListPostsResult) -> Self {
        Self {
            posts: result.posts.into_iter().map(PostDto::from).collect(),
            limit: result.limit,
            offset: result.offset,
            total: result.total,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "posts",
    params(
        ("limit" = Option<u32>, Query, description = "Items per page (1..=100, default 20)"),
        ("offset" = Option<u32>, Query, description = "Offset from the beginning (>= 0)")
    ),
    responses(
        (status = 200, description = "Posts listed", body = ListPostsResponseDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<(StatusCode, Json<ListPostsResponseDto>)> {
    query.validate()?;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let result = state.blog_service.list_posts(limit, offset).await?;

    Ok((StatusCode::OK, Json(ListPostsResponseDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let result = state.blog_service.get_post(id).await?;

    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error or duplicate slug"),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown category"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = CreatePostRequest {
        title: dto.title,
        slug: dto.slug,
        content: dto.content,
        categories: dto.categories,
    };

    let result = state.blog_service.create_post(&auth.user, req).await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(result))))
}

#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Caller is not the admin author"),
        (status = 404, description = "Post or category not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = UpdatePostRequest {
        title: dto.title,
        content: dto.content,
        categories: dto.categories,
    };

    let result = state
        .blog_service
        .update_post(&auth.user, id, PostPatch::from(req))
        .await?;
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = PatchPostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Caller is not the admin author"),
        (status = 404, description = "Post or category not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn patch_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(dto): Json<PatchPostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let patch = PostPatch {
        title: dto.title,
        content: dto.content,
        categories: dto.categories,
    };

    let result = state.blog_service.update_post(&auth.user, id, patch).await?;
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Invalid token"),
        (status = 403, description = "Caller is not the admin author"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.blog_service.delete_post(&auth.user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use validator::Validate;

    use super::{PaginationQuery, PatchPostDto, PostDto};
    use crate::domain::category::Category;
    use crate::domain::post::Post;

    #[test]
    fn post_dto_exposes_author_email_and_categories() {
        let now = Utc::now();
        let post = Post::new(
            3,
            "Title",
            "title",
            "<p>Body</p>",
            7,
            "author@x.com",
            vec![Category::new("rust", "Rust").expect("valid category")],
            now,
            now,
        )
        .expect("valid post");

        let json = serde_json::to_value(PostDto::from(post)).expect("must serialize");
        assert_eq!(json["author"], "author@x.com");
        assert_eq!(json["author_id"], 7);
        assert_eq!(json["categories"][0]["slug"], "rust");
        assert_eq!(json["categories"][0]["name"], "Rust");
    }

    #[test]
    fn pagination_limit_is_bounded() {
        let too_big = PaginationQuery {
            limit: Some(101),
            offset: None,
        };
        assert!(too_big.validate().is_err());

        let zero = PaginationQuery {
            limit: Some(0),
            offset: Some(5),
        };
        assert!(zero.validate().is_err());

        let defaults = PaginationQuery {
            limit: None,
            offset: None,
        };
        assert!(defaults.validate().is_ok());
    }

    #[test]
    fn patch_dto_accepts_absent_fields_but_not_blank_title() {
        assert!(PatchPostDto::default().validate().is_ok());

        let blank = PatchPostDto {
            title: Some(String::new()),
            ..PatchPostDto::default()
        };
        assert!(blank.validate().is_err());
    }
}
