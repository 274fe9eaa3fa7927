use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{BlogClientError, BlogClientResult, ErrorBody};
use crate::models::{Category, ListPostsResponse, NewPost, Post, PostPatch, Profile, Role, TokenPair};

#[derive(Debug, Serialize)]
struct RegisterRequestDto<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequestDto<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
struct SetRoleRequestDto<'a> {
    user_email: &'a str,
    role: Role,
}

#[derive(Debug, Serialize)]
struct CategoryRequestDto<'a> {
    name: &'a str,
    slug: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdatePostRequestDto<'a> {
    title: &'a str,
    content: &'a str,
    categories: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ListPostsResponseDto {
    posts: Vec<Post>,
    limit: u32,
    offset: u32,
    total: i64,
}

#[derive(Serialize)]
struct ListPostsQuery {
    limit: u32,
    offset: u32,
}

impl From<ListPostsResponseDto> for ListPostsResponse {
    fn from(value: ListPostsResponseDto) -> Self {
        Self {
            posts: value.posts,
            limit: value.limit,
            offset: value.offset,
            total: value.total.max(0) as u64,
        }
    }
}

#[derive(Debug, Clone)]
/// HTTP-клиент для работы с REST API `blog-server` (`/api/v1`).
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub fn new(base_url: impl Into<String>) -> BlogClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/v1/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> BlogClientError {
        let status = response.status();
        let body = response.json::<ErrorBody>().await.ok();
        BlogClientError::from_http_status(status, body)
    }

    async fn execute(request: RequestBuilder) -> BlogClientResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(BlogClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    /// универсальный helper: отправляет запрос и разбирает json-ответ
    async fn fetch<TRes>(request: RequestBuilder) -> BlogClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        Self::execute(request)
            .await?
            .json::<TRes>()
            .await
            .map_err(BlogClientError::from_reqwest)
    }

    /// Регистрирует пользователя и возвращает пару токенов.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> BlogClientResult<TokenPair> {
        let payload = RegisterRequestDto {
            email,
            password,
            full_name,
        };
        Self::fetch(self.request(Method::POST, "/auth/register", None).json(&payload)).await
    }

    /// Выполняет вход и возвращает пару токенов.
    pub async fn login(&self, email: &str, password: &str) -> BlogClientResult<TokenPair> {
        let payload = LoginRequestDto { email, password };
        Self::fetch(self.request(Method::POST, "/auth/login", None).json(&payload)).await
    }

    /// Обменивает refresh token на новую пару.
    ///
    /// Токен передаётся и в заголовке, и в теле запроса.
    pub async fn refresh(&self, refresh_token: &str) -> BlogClientResult<TokenPair> {
        let payload = RefreshRequestDto { refresh_token };
        Self::fetch(
            self.request(Method::POST, "/auth/refresh", Some(refresh_token))
                .json(&payload),
        )
        .await
    }

    /// Возвращает профиль владельца access token.
    pub async fn me(&self, token: &str) -> BlogClientResult<Profile> {
        Self::fetch(self.request(Method::GET, "/auth/me", Some(token))).await
    }

    /// Меняет роль пользователя. Требует роль ADMIN.
    pub async fn set_role(&self, token: &str, user_email: &str, role: Role) -> BlogClientResult<()> {
        let payload = SetRoleRequestDto { user_email, role };
        Self::execute(
            self.request(Method::POST, "/auth/set-role", Some(token))
                .json(&payload),
        )
        .await?;
        Ok(())
    }

    /// Возвращает все категории.
    pub async fn list_categories(&self) -> BlogClientResult<Vec<Category>> {
        Self::fetch(self.request(Method::GET, "/categories", None)).await
    }

    /// Возвращает категорию по slug.
    pub async fn get_category(&self, slug: &str) -> BlogClientResult<Category> {
        Self::fetch(self.request(Method::GET, &format!("/categories/{slug}"), None)).await
    }

    /// Создаёт категорию. Требует роль ADMIN.
    pub async fn create_category(
        &self,
        token: &str,
        name: &str,
        slug: &str,
    ) -> BlogClientResult<Category> {
        let payload = CategoryRequestDto { name, slug };
        Self::fetch(
            self.request(Method::POST, "/categories", Some(token))
                .json(&payload),
        )
        .await
    }

    /// Полностью заменяет имя и slug категории. Требует роль ADMIN.
    pub async fn update_category(
        &self,
        token: &str,
        slug: &str,
        name: &str,
        new_slug: &str,
    ) -> BlogClientResult<Category> {
        let payload = CategoryRequestDto {
            name,
            slug: new_slug,
        };
        Self::fetch(
            self.request(Method::PUT, &format!("/categories/{slug}"), Some(token))
                .json(&payload),
        )
        .await
    }

    /// Удаляет категорию. Требует роль ADMIN.
    pub async fn delete_category(&self, token: &str, slug: &str) -> BlogClientResult<()> {
        Self::execute(self.request(Method::DELETE, &format!("/categories/{slug}"), Some(token)))
            .await?;
        Ok(())
    }

    /// Создаёт пост. Требует роль ADMIN.
    pub async fn create_post(&self, token: &str, post: &NewPost) -> BlogClientResult<Post> {
        Self::fetch(self.request(Method::POST, "/posts", Some(token)).json(post)).await
    }

    /// Получает пост по идентификатору.
    pub async fn get_post(&self, id: i64) -> BlogClientResult<Post> {
        Self::fetch(self.request(Method::GET, &format!("/posts/{id}"), None)).await
    }

    /// Полностью обновляет пост. Требует роль ADMIN и авторство.
    pub async fn update_post(
        &self,
        token: &str,
        id: i64,
        title: &str,
        content: &str,
        categories: &[String],
    ) -> BlogClientResult<Post> {
        let payload = UpdatePostRequestDto {
            title,
            content,
            categories,
        };
        Self::fetch(
            self.request(Method::PUT, &format!("/posts/{id}"), Some(token))
                .json(&payload),
        )
        .await
    }

    /// Частично обновляет пост. Требует роль ADMIN и авторство.
    pub async fn patch_post(&self, token: &str, id: i64, patch: &PostPatch) -> BlogClientResult<Post> {
        Self::fetch(
            self.request(Method::PATCH, &format!("/posts/{id}"), Some(token))
                .json(patch),
        )
        .await
    }

    /// Удаляет пост по идентификатору. Требует роль ADMIN и авторство.
    pub async fn delete_post(&self, token: &str, id: i64) -> BlogClientResult<()> {
        Self::execute(self.request(Method::DELETE, &format!("/posts/{id}"), Some(token))).await?;
        Ok(())
    }

    /// Возвращает список постов с пагинацией `limit/offset`.
    pub async fn list_posts(&self, limit: u32, offset: u32) -> BlogClientResult<ListPostsResponse> {
        let query = ListPostsQuery { limit, offset };
        let dto: ListPostsResponseDto =
            Self::fetch(self.request(Method::GET, "/posts", None).query(&query)).await?;
        Ok(dto.into())
    }
}
