use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::data::category_repository::CategoryRepository;
use crate::domain::category::Category;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
pub(super) struct CategoryRow {
    pub(super) slug: String,
    pub(super) name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            slug: row.slug,
            name: row.name,
        }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create_category(&self, category: &Category) -> Result<Category, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (slug, name)
            VALUES ($1, $2)
            RETURNING slug, name
            "#,
        )
        .bind(&category.slug)
        .bind(&category.name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        Ok(row.into())
    }

    async fn get_category(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT slug, name
            FROM categories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        Ok(row.map(Category::from))
    }

    async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Category>, DomainError> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT slug, name
            FROM categories
            WHERE slug = ANY($1)
            ORDER BY slug
            "#,
        )
        .bind(slugs)
        .fetch_all(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT slug, name
            FROM categories
            ORDER BY slug
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn update_category(
        &self,
        slug: &str,
        category: &Category,
    ) -> Result<Option<Category>, DomainError> {
        // post_category.category_slug следует за переименованием через ON UPDATE CASCADE
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET slug = $2,
                name = $3
            WHERE slug = $1
            RETURNING slug, name
            "#,
        )
        .bind(slug)
        .bind(&category.slug)
        .bind(&category.name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        Ok(row.map(Category::from))
    }

    async fn delete_category(&self, slug: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM categories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .execute(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_category_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23505")
    {
        return DomainError::AlreadyExists("category slug".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
