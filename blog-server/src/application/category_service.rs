use tracing::{info, warn};

use crate::data::category_repository::CategoryRepository;
use crate::domain::access::require_admin;
use crate::domain::category::{Category, CategoryPatch, CreateCategoryRequest, normalize_category_slug};
use crate::domain::error::DomainError;
use crate::domain::user::User;

pub(crate) struct CategoryService<C: CategoryRepository> {
    repo: C,
}

impl<C: CategoryRepository> CategoryService<C> {
    pub(crate) fn new(repo: C) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_category(
        &self,
        actor: &User,
        req: CreateCategoryRequest,
    ) -> Result<Category, DomainError> {
        guard(actor, "create category")?;
        let category = req.into_category()?;
        let created = self.repo.create_category(&category).await?;

        info!(slug = %created.slug, actor_id = actor.id, "category created");
        Ok(created)
    }

    pub(crate) async fn get_category(&self, slug: &str) -> Result<Category, DomainError> {
        let slug = normalize_category_slug(slug)?;
        self.repo
            .get_category(&slug)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("category slug: {slug}")))
    }

    pub(crate) async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.repo.list_categories().await
    }

    /// Renaming the slug keeps existing post links pointing at the category.
    pub(crate) async fn update_category(
        &self,
        actor: &User,
        slug: &str,
        patch: CategoryPatch,
    ) -> Result<Category, DomainError> {
        guard(actor, "update category")?;
        let current = self.get_category(slug).await?;
        let original_slug = current.slug.clone();
        let updated = current.apply(patch)?;

        let saved = self
            .repo
            .update_category(&original_slug, &updated)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("category slug: {original_slug}")))?;

        info!(from = %original_slug, to = %saved.slug, actor_id = actor.id, "category updated");
        Ok(saved)
    }

    pub(crate) async fn delete_category(&self, actor: &User, slug: &str) -> Result<(), DomainError> {
        guard(actor, "delete category")?;
        let slug = normalize_category_slug(slug)?;
        if !self.repo.delete_category(&slug).await? {
            return Err(DomainError::NotFound(format!("category slug: {slug}")));
        }

        info!(%slug, actor_id = actor.id, "category deleted");
        Ok(())
    }
}

fn guard(actor: &User, action: &'static str) -> Result<(), DomainError> {
    require_admin(actor).inspect_err(|_| {
        warn!(actor_id = actor.id, role = %actor.role, action, "access denied");
    })
}
