use sqlx::PgPool;
use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::category_service::CategoryService;
use crate::application::principal::PrincipalResolver;
use crate::data::repositories::postgres::category_repository::PostgresCategoryRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::jwt::TokenService;

pub(crate) mod http;

pub(crate) type PostService = BlogService<PostgresPostRepository, PostgresCategoryRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) pool: PgPool,
    pub(crate) tokens: Arc<TokenService>,
    pub(crate) principals: Arc<PrincipalResolver<PostgresUserRepository>>,
    pub(crate) auth_service: Arc<AuthService<PostgresUserRepository>>,
    pub(crate) blog_service: Arc<PostService>,
    pub(crate) category_service: Arc<CategoryService<PostgresCategoryRepository>>,
}

impl AppState {
    pub(crate) fn new(pool: PgPool, tokens: Arc<TokenService>) -> Self {
        let users = PostgresUserRepository::new(pool.clone());
        let posts = PostgresPostRepository::new(pool.clone());
        let categories = PostgresCategoryRepository::new(pool.clone());

        Self {
            principals: Arc::new(PrincipalResolver::new(users.clone())),
            auth_service: Arc::new(AuthService::new(users, Arc::clone(&tokens))),
            blog_service: Arc::new(BlogService::new(posts, categories.clone())),
            category_service: Arc::new(CategoryService::new(categories)),
            pool,
            tokens,
        }
    }
}
