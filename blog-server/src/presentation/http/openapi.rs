use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::auth::{
    LoginDto, MeDto, RefreshDto, RegisterDto, RoleDto, SetRoleDto, TokenPairDto,
};
use crate::presentation::http::handlers::categories::{
    CategoryDto, CategoryInputDto, PatchCategoryDto,
};
use crate::presentation::http::handlers::posts::{
    CreatePostDto, ListPostsResponseDto, PaginationQuery, PatchPostDto, PostDto, UpdatePostDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::auth::register,
        crate::presentation::http::handlers::auth::login,
        crate::presentation::http::handlers::auth::refresh,
        crate::presentation::http::handlers::auth::me,
        crate::presentation::http::handlers::auth::set_role,
        crate::presentation::http::handlers::categories::list_categories,
        crate::presentation::http::handlers::categories::get_category,
        crate::presentation::http::handlers::categories::create_category,
        crate::presentation::http::handlers::categories::update_category,
        crate::presentation::http::handlers::categories::patch_category,
        crate::presentation::http::handlers::categories::delete_category,
        crate::presentation::http::handlers::posts::list_posts,
        crate::presentation::http::handlers::posts::get_post,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::update_post,
        crate::presentation::http::handlers::posts::patch_post,
        crate::presentation::http::handlers::posts::delete_post
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            RefreshDto,
            RoleDto,
            SetRoleDto,
            TokenPairDto,
            MeDto,
            CategoryDto,
            CategoryInputDto,
            PatchCategoryDto,
            CreatePostDto,
            UpdatePostDto,
            PatchPostDto,
            PaginationQuery,
            PostDto,
            ListPostsResponseDto
        )
    ),
    tags(
        (name = "auth", description = "Registration, login, token refresh and roles"),
        (name = "categories", description = "Category endpoints"),
        (name = "posts", description = "Post endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/auth/register",
            "/api/v1/auth/login",
            "/api/v1/auth/refresh",
            "/api/v1/auth/me",
            "/api/v1/auth/set-role",
            "/api/v1/categories",
            "/api/v1/categories/{slug}",
            "/api/v1/posts",
            "/api/v1/posts/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
