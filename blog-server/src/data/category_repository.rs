use async_trait::async_trait;

use crate::domain::category::Category;
use crate::domain::error::DomainError;

#[async_trait]
pub(crate) trait CategoryRepository: Send + Sync {
    async fn create_category(&self, category: &Category) -> Result<Category, DomainError>;
    async fn get_category(&self, slug: &str) -> Result<Option<Category>, DomainError>;
    async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Category>, DomainError>;
    async fn list_categories(&self) -> Result<Vec<Category>, DomainError>;
    async fn update_category(
        &self,
        slug: &str,
        category: &Category,
    ) -> Result<Option<Category>, DomainError>;
    async fn delete_category(&self, slug: &str) -> Result<bool, DomainError>;
}
