use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Пара токенов, выдаваемая при регистрации, входе и обновлении.
pub struct TokenPair {
    /// Короткоживущий access token для защищённых запросов.
    pub access_token: String,
    /// Долгоживущий refresh token для получения новой пары.
    pub refresh_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
/// Роль пользователя.
pub enum Role {
    /// Обычный пользователь.
    User,
    /// Администратор: управляет категориями, постами и ролями.
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Профиль текущего пользователя (`GET /auth/me`).
pub struct Profile {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Email.
    pub email: String,
    /// Полное имя, если указано.
    pub full_name: Option<String>,
    /// Роль.
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Категория постов.
pub struct Category {
    /// Нормализованный slug.
    pub slug: String,
    /// Отображаемое имя.
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель поста.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок поста.
    pub title: String,
    /// Slug поста.
    pub slug: String,
    /// Санитизированное содержимое поста.
    pub content: String,
    /// Email автора.
    pub author: String,
    /// Идентификатор автора.
    pub author_id: i64,
    /// Категории поста.
    pub categories: Vec<Category>,
    /// Дата и время создания поста (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления поста (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Данные для создания поста.
pub struct NewPost {
    /// Заголовок.
    pub title: String,
    /// Slug; если не задан, сервер построит его из заголовка.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Содержимое (HTML будет санитизирован сервером).
    pub content: String,
    /// Slug'и существующих категорий.
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Частичное обновление поста: отсутствующие поля не меняются.
pub struct PostPatch {
    /// Новый заголовок.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Новое содержимое.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Новый набор категорий.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ списка постов с параметрами пагинации.
pub struct ListPostsResponse {
    /// Список постов на текущей странице.
    pub posts: Vec<Post>,
    /// Размер страницы.
    pub limit: u32,
    /// Смещение от начала выборки.
    pub offset: u32,
    /// Общее количество постов.
    pub total: u64,
}
