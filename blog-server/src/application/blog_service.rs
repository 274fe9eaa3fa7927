use tracing::{info, warn};

use crate::data::category_repository::CategoryRepository;
use crate::data::post_repository::{NewPost, Pagination, PostRepository};
use crate::domain::access::{require_admin, require_admin_author};
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, Post, PostChanges, PostPatch};
use crate::domain::user::User;
use crate::infrastructure::sanitize::sanitize_html;

#[derive(Debug, Clone)]
pub(crate) struct ListPostsResult {
    pub(crate) posts: Vec<Post>,
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) total: i64,
}

pub(crate) struct BlogService<P: PostRepository, C: CategoryRepository> {
    posts: P,
    categories: C,
}

impl<P: PostRepository, C: CategoryRepository> BlogService<P, C> {
    pub(crate) fn new(posts: P, categories: C) -> Self {
        Self { posts, categories }
    }

    pub(crate) async fn create_post(
        &self,
        actor: &User,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        require_admin(actor).inspect_err(|_| deny(actor, "create post"))?;
        let req = req.validate()?;

        let content = sanitize_content(&req.content)?;
        let categories = self.resolve_categories(&req.categories).await?;

        let new_post = NewPost {
            title: req.title,
            slug: req.slug.unwrap_or_default(),
            content,
            author_id: actor.id,
            categories: categories.into_iter().map(|category| category.slug).collect(),
        };
        let post = self.posts.create_post(new_post).await?;

        info!(post_id = post.id, author_id = actor.id, "post created");
        Ok(post)
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {id}")))
    }

    /// Full and partial updates both arrive here; a full update is a patch with
    /// every field set.
    pub(crate) async fn update_post(
        &self,
        actor: &User,
        post_id: i64,
        patch: PostPatch,
    ) -> Result<Post, DomainError> {
        require_admin(actor).inspect_err(|_| deny(actor, "update post"))?;
        let original = self.get_post(post_id).await?;
        require_admin_author(actor, &original).inspect_err(|_| deny(actor, "update post"))?;

        let patch = patch.validate()?;
        let content = patch.content.as_deref().map(sanitize_content).transpose()?;
        let categories = match patch.categories {
            Some(slugs) => Some(self.resolve_categories(&slugs).await?),
            None => None,
        };

        let merged = original.apply(PostChanges {
            title: patch.title,
            content,
            categories,
        });

        self.posts
            .update_post(&merged)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))
    }

    pub(crate) async fn delete_post(&self, actor: &User, post_id: i64) -> Result<(), DomainError> {
        require_admin(actor).inspect_err(|_| deny(actor, "delete post"))?;
        let original = self.get_post(post_id).await?;
        require_admin_author(actor, &original).inspect_err(|_| deny(actor, "delete post"))?;

        let deleted = self.posts.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }

        info!(post_id, author_id = actor.id, "post deleted");
        Ok(())
    }

    pub(crate) async fn list_posts(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<ListPostsResult, DomainError> {
        let pagination = Pagination { limit, offset };
        let posts = self.posts.list_posts(pagination).await?;
        let total = self.posts.total_posts().await?;

        Ok(ListPostsResult {
            posts,
            limit,
            offset,
            total,
        })
    }

    /// Every referenced slug must exist; the first unknown one aborts the write.
    async fn resolve_categories(&self, slugs: &[String]) -> Result<Vec<Category>, DomainError> {
        let found = self.categories.find_by_slugs(slugs).await?;
        if let Some(missing) = slugs
            .iter()
            .find(|slug| !found.iter().any(|category| &category.slug == *slug))
        {
            return Err(DomainError::NotFound(format!("category slug: {missing}")));
        }
        Ok(found)
    }
}

fn sanitize_content(content: &str) -> Result<String, DomainError> {
    let cleaned = sanitize_html(content);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty after sanitization",
        });
    }
    Ok(cleaned.to_string())
}

fn deny(actor: &User, action: &'static str) {
    warn!(actor_id = actor.id, role = %actor.role, action, "access denied");
}
