//! Mutex-backed repositories for service tests. Mirrors the Postgres constraints
//! the services rely on: unique email, unique post slug, category foreign keys.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::data::category_repository::CategoryRepository;
use crate::data::post_repository::{NewPost, Pagination, PostRepository};
use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::user::{User, UserRole};

#[derive(Debug, Clone)]
struct PostRecord {
    title: String,
    slug: String,
    content: String,
    author_id: i64,
    categories: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, UserCredentials>,
    categories: BTreeMap<String, String>,
    posts: BTreeMap<i64, PostRecord>,
    next_user_id: i64,
    next_post_id: i64,
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("in-memory store mutex poisoned")
    }

    pub(crate) fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub(crate) fn category_count(&self) -> usize {
        self.lock().categories.len()
    }

    pub(crate) fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    pub(crate) fn role_of(&self, email: &str) -> Option<UserRole> {
        self.lock()
            .users
            .values()
            .find(|creds| creds.user.email == email)
            .map(|creds| creds.user.role)
    }

    pub(crate) fn stored_content(&self, post_id: i64) -> Option<String> {
        self.lock()
            .posts
            .get(&post_id)
            .map(|record| record.content.clone())
    }

    /// Inserts a user directly, bypassing registration.
    pub(crate) fn seed_user(&self, email: &str, role: UserRole) -> User {
        let mut state = self.lock();
        state.next_user_id += 1;
        let user = User::new(state.next_user_id, email, None, role, Utc::now())
            .expect("seeded user must be valid");
        state.users.insert(
            user.id,
            UserCredentials {
                user: user.clone(),
                password_hash: "not-a-real-hash".to_string(),
            },
        );
        user
    }

    pub(crate) fn seed_category(&self, slug: &str, name: &str) -> Category {
        let category = Category::new(slug, name).expect("seeded category must be valid");
        self.lock()
            .categories
            .insert(category.slug.clone(), category.name.clone());
        category
    }

    fn hydrate(state: &State, id: i64, record: &PostRecord) -> Result<Post, DomainError> {
        let author_email = state
            .users
            .get(&record.author_id)
            .map(|creds| creds.user.email.clone())
            .ok_or_else(|| DomainError::NotFound("author".to_string()))?;
        let mut categories: Vec<Category> = record
            .categories
            .iter()
            .filter_map(|slug| {
                state.categories.get(slug).map(|name| Category {
                    slug: slug.clone(),
                    name: name.clone(),
                })
            })
            .collect();
        categories.sort_by(|a, b| a.slug.cmp(&b.slug));

        Post::new(
            id,
            record.title.clone(),
            record.slug.clone(),
            record.content.clone(),
            record.author_id,
            author_email,
            categories,
            record.created_at,
            record.updated_at,
        )
    }

    fn check_category_links(state: &State, slugs: &[String]) -> Result<(), DomainError> {
        match slugs.iter().find(|slug| !state.categories.contains_key(*slug)) {
            Some(missing) => Err(DomainError::NotFound(format!("category slug: {missing}"))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state
            .users
            .values()
            .any(|creds| creds.user.email == input.email)
        {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }

        state.next_user_id += 1;
        let user = User::new(
            state.next_user_id,
            input.email,
            input.full_name,
            input.role,
            Utc::now(),
        )?;
        state.users.insert(
            user.id,
            UserCredentials {
                user: user.clone(),
                password_hash: input.password_hash,
            },
        );
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self.lock().users.get(&id).map(|creds| creds.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|creds| creds.user.email == email)
            .cloned())
    }

    async fn update_role(&self, id: i64, role: UserRole) -> Result<Option<User>, DomainError> {
        let mut state = self.lock();
        Ok(state.users.get_mut(&id).map(|creds| {
            creds.user.role = role;
            creds.user.clone()
        }))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn create_category(&self, category: &Category) -> Result<Category, DomainError> {
        let mut state = self.lock();
        if state.categories.contains_key(&category.slug) {
            return Err(DomainError::AlreadyExists("category slug".to_string()));
        }
        state
            .categories
            .insert(category.slug.clone(), category.name.clone());
        Ok(category.clone())
    }

    async fn get_category(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        Ok(self.lock().categories.get(slug).map(|name| Category {
            slug: slug.to_string(),
            name: name.clone(),
        }))
    }

    async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Category>, DomainError> {
        let state = self.lock();
        Ok(state
            .categories
            .iter()
            .filter(|(slug, _)| slugs.contains(slug))
            .map(|(slug, name)| Category {
                slug: slug.clone(),
                name: name.clone(),
            })
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self
            .lock()
            .categories
            .iter()
            .map(|(slug, name)| Category {
                slug: slug.clone(),
                name: name.clone(),
            })
            .collect())
    }

    async fn update_category(
        &self,
        slug: &str,
        category: &Category,
    ) -> Result<Option<Category>, DomainError> {
        let mut state = self.lock();
        if !state.categories.contains_key(slug) {
            return Ok(None);
        }
        if category.slug != slug && state.categories.contains_key(&category.slug) {
            return Err(DomainError::AlreadyExists("category slug".to_string()));
        }

        state.categories.remove(slug);
        state
            .categories
            .insert(category.slug.clone(), category.name.clone());
        for record in state.posts.values_mut() {
            for linked in record.categories.iter_mut() {
                if linked == slug {
                    *linked = category.slug.clone();
                }
            }
        }
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, slug: &str) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let removed = state.categories.remove(slug).is_some();
        for record in state.posts.values_mut() {
            record.categories.retain(|linked| linked != slug);
        }
        Ok(removed)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.lock();
        if state.posts.values().any(|record| record.slug == input.slug) {
            return Err(DomainError::AlreadyExists("post slug".to_string()));
        }
        if !state.users.contains_key(&input.author_id) {
            return Err(DomainError::NotFound("author".to_string()));
        }
        Self::check_category_links(&state, &input.categories)?;

        state.next_post_id += 1;
        let id = state.next_post_id;
        let now = Utc::now();
        let record = PostRecord {
            title: input.title,
            slug: input.slug,
            content: input.content,
            author_id: input.author_id,
            categories: input.categories,
            created_at: now,
            updated_at: now,
        };
        let post = Self::hydrate(&state, id, &record)?;
        state.posts.insert(id, record);
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let state = self.lock();
        state
            .posts
            .get(&id)
            .map(|record| Self::hydrate(&state, id, record))
            .transpose()
    }

    async fn update_post(&self, post: &Post) -> Result<Option<Post>, DomainError> {
        let mut state = self.lock();
        let slugs = post.category_slugs();
        Self::check_category_links(&state, &slugs)?;

        let Some(record) = state.posts.get_mut(&post.id) else {
            return Ok(None);
        };
        record.title = post.title.clone();
        record.content = post.content.clone();
        record.categories = slugs;
        record.updated_at = Utc::now();
        let record = record.clone();

        Self::hydrate(&state, post.id, &record).map(Some)
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.lock().posts.remove(&id).is_some())
    }

    async fn list_posts(&self, pagination: Pagination) -> Result<Vec<Post>, DomainError> {
        let state = self.lock();
        state
            .posts
            .iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .map(|(id, record)| Self::hydrate(&state, *id, record))
            .collect()
    }

    async fn total_posts(&self) -> Result<i64, DomainError> {
        Ok(self.lock().posts.len() as i64)
    }
}
