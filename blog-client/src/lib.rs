//! Клиентская библиотека для работы с blog-server по HTTP.
//!
//! Предоставляет типизированный API (`BlogClient`) поверх `reqwest`.
//!
//! Клиент хранит пару токенов после `register`/`login`/`refresh` и
//! автоматически подставляет access token в защищённые операции.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{BlogClientError, BlogClientResult};
pub use http_client::HttpClient;
pub use models::{Category, ListPostsResponse, NewPost, Post, PostPatch, Profile, Role, TokenPair};

#[derive(Debug, Clone)]
/// Клиент блог-сервиса с сохранённой парой токенов.
pub struct BlogClient {
    http_client: HttpClient,
    tokens: Option<TokenPair>,
}

impl BlogClient {
    /// Создаёт клиент для сервера с базовым URL, например `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> BlogClientResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(base_url)?,
            tokens: None,
        })
    }

    /// Устанавливает пару токенов вручную (например, прочитанную из файла).
    pub fn set_tokens(&mut self, tokens: TokenPair) {
        self.tokens = Some(tokens);
    }

    /// Возвращает текущую пару токенов, если она установлена.
    pub fn tokens(&self) -> Option<&TokenPair> {
        self.tokens.as_ref()
    }

    /// Очищает сохранённые токены.
    pub fn clear_tokens(&mut self) {
        self.tokens = None;
    }

    /// Регистрирует пользователя и сохраняет полученные токены.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> BlogClientResult<TokenPair> {
        let tokens = self
            .http_client
            .register(email, password, full_name)
            .await?;
        self.tokens = Some(tokens.clone());
        Ok(tokens)
    }

    /// Выполняет вход и сохраняет полученные токены.
    pub async fn login(&mut self, email: &str, password: &str) -> BlogClientResult<TokenPair> {
        let tokens = self.http_client.login(email, password).await?;
        self.tokens = Some(tokens.clone());
        Ok(tokens)
    }

    /// Обновляет пару токенов по сохранённому refresh token.
    pub async fn refresh(&mut self) -> BlogClientResult<TokenPair> {
        let refresh_token = self
            .tokens
            .as_ref()
            .map(|tokens| tokens.refresh_token.clone())
            .ok_or_else(missing_token)?;
        let tokens = self.http_client.refresh(&refresh_token).await?;
        self.tokens = Some(tokens.clone());
        Ok(tokens)
    }

    /// Возвращает профиль текущего пользователя.
    pub async fn me(&self) -> BlogClientResult<Profile> {
        self.http_client.me(self.access_token()?).await
    }

    /// Меняет роль пользователя по email. Требует роль ADMIN.
    pub async fn set_role(&self, user_email: &str, role: Role) -> BlogClientResult<()> {
        self.http_client
            .set_role(self.access_token()?, user_email, role)
            .await
    }

    /// Возвращает все категории.
    pub async fn list_categories(&self) -> BlogClientResult<Vec<Category>> {
        self.http_client.list_categories().await
    }

    /// Возвращает категорию по slug.
    pub async fn get_category(&self, slug: &str) -> BlogClientResult<Category> {
        self.http_client.get_category(slug).await
    }

    /// Создаёт категорию. Требует роль ADMIN.
    pub async fn create_category(&self, name: &str, slug: &str) -> BlogClientResult<Category> {
        self.http_client
            .create_category(self.access_token()?, name, slug)
            .await
    }

    /// Заменяет имя и slug категории. Требует роль ADMIN.
    pub async fn update_category(
        &self,
        slug: &str,
        name: &str,
        new_slug: &str,
    ) -> BlogClientResult<Category> {
        self.http_client
            .update_category(self.access_token()?, slug, name, new_slug)
            .await
    }

    /// Удаляет категорию. Требует роль ADMIN.
    pub async fn delete_category(&self, slug: &str) -> BlogClientResult<()> {
        self.http_client
            .delete_category(self.access_token()?, slug)
            .await
    }

    /// Создаёт новый пост. Требует роль ADMIN.
    pub async fn create_post(&self, post: &NewPost) -> BlogClientResult<Post> {
        self.http_client
            .create_post(self.access_token()?, post)
            .await
    }

    /// Возвращает пост по идентификатору.
    pub async fn get_post(&self, id: i64) -> BlogClientResult<Post> {
        self.http_client.get_post(id).await
    }

    /// Полностью обновляет пост. Требует роль ADMIN и авторство.
    pub async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        categories: &[String],
    ) -> BlogClientResult<Post> {
        self.http_client
            .update_post(self.access_token()?, id, title, content, categories)
            .await
    }

    /// Частично обновляет пост. Требует роль ADMIN и авторство.
    pub async fn patch_post(&self, id: i64, patch: &PostPatch) -> BlogClientResult<Post> {
        self.http_client
            .patch_post(self.access_token()?, id, patch)
            .await
    }

    /// Удаляет пост по идентификатору. Требует роль ADMIN и авторство.
    pub async fn delete_post(&self, id: i64) -> BlogClientResult<()> {
        self.http_client
            .delete_post(self.access_token()?, id)
            .await
    }

    /// Возвращает список постов с пагинацией.
    pub async fn list_posts(&self, limit: u32, offset: u32) -> BlogClientResult<ListPostsResponse> {
        self.http_client.list_posts(limit, offset).await
    }

    fn access_token(&self) -> BlogClientResult<&str> {
        self.tokens
            .as_ref()
            .map(|tokens| tokens.access_token.as_str())
            .ok_or_else(missing_token)
    }
}

fn missing_token() -> BlogClientError {
    BlogClientError::Unauthorized("no stored token, login first".to_string())
}

#[cfg(test)]
mod tests {
    use super::{BlogClient, BlogClientError, TokenPair};

    #[tokio::test]
    async fn protected_calls_require_tokens() {
        let client = BlogClient::new("http://127.0.0.1:9").expect("client must build");

        let err = client.me().await.expect_err("no token stored");
        assert!(matches!(err, BlogClientError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn refresh_requires_stored_pair() {
        let mut client = BlogClient::new("http://127.0.0.1:9").expect("client must build");

        let err = client.refresh().await.expect_err("no token stored");
        assert!(matches!(err, BlogClientError::Unauthorized(_)));
    }

    #[test]
    fn tokens_can_be_set_and_cleared() {
        let mut client = BlogClient::new("http://127.0.0.1:9").expect("client must build");
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };

        client.set_tokens(pair.clone());
        assert_eq!(client.tokens(), Some(&pair));

        client.clear_tokens();
        assert!(client.tokens().is_none());
    }
}
