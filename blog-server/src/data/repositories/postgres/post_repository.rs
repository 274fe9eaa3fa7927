use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::data::post_repository::{NewPost, Pagination, PostRepository};
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_categories(
        &self,
        post_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Category>>, DomainError> {
        let mut by_post: HashMap<i64, Vec<Category>> = HashMap::new();
        if post_ids.is_empty() {
            return Ok(by_post);
        }

        let rows = sqlx::query_as::<_, PostCategoryRow>(
            r#"
            SELECT pc.post_id, c.slug, c.name
            FROM post_category pc
            JOIN categories c ON c.slug = pc.category_slug
            WHERE pc.post_id = ANY($1)
            ORDER BY pc.post_id, c.slug
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        for row in rows {
            by_post.entry(row.post_id).or_default().push(Category {
                slug: row.slug,
                name: row.name,
            });
        }
        Ok(by_post)
    }

    async fn hydrate(&self, rows: Vec<PostRow>) -> Result<Vec<Post>, DomainError> {
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut categories = self.load_categories(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let post_categories = categories.remove(&row.id).unwrap_or_default();
                map_row_to_post(row, post_categories)
            })
            .collect()
    }
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    title: String,
    slug: String,
    content: String,
    author_id: i64,
    author_email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct PostCategoryRow {
    post_id: i64,
    slug: String,
    name: String,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_post_db_error)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (title, slug, content, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.content)
        .bind(input.author_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_post_db_error)?;

        attach_categories(&mut tx, id, &input.categories).await?;
        tx.commit().await.map_err(map_post_db_error)?;

        self.get_post(id)
            .await?
            .ok_or_else(|| DomainError::Unexpected(format!("created post {id} is not visible")))
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
            p.id,
            p.title,
            p.slug,
            p.content,
            p.author_id,
            u.email AS author_email,
            p.created_at,
            p.updated_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn update_post(&self, post: &Post) -> Result<Option<Post>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_post_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = $2,
                content = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.content)
        .execute(&mut *tx)
        .await
        .map_err(map_post_db_error)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        sqlx::query("DELETE FROM post_category WHERE post_id = $1")
            .bind(post.id)
            .execute(&mut *tx)
            .await
            .map_err(map_post_db_error)?;
        attach_categories(&mut tx, post.id, &post.category_slugs()).await?;

        tx.commit().await.map_err(map_post_db_error)?;
        self.get_post(post.id).await
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self, pagination: Pagination) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                p.id,
                p.title,
                p.slug,
                p.content,
                p.author_id,
                u.email AS author_email,
                p.created_at,
                p.updated_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.id
            LIMIT $1
            OFFSET $2
            "#,
        )
        .bind(i64::from(pagination.limit))
        .bind(i64::from(pagination.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        self.hydrate(rows).await
    }

    async fn total_posts(&self) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM posts
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(count)
    }
}

async fn attach_categories(
    conn: &mut PgConnection,
    post_id: i64,
    slugs: &[String],
) -> Result<(), DomainError> {
    for slug in slugs {
        sqlx::query(
            r#"
            INSERT INTO post_category (post_id, category_slug)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(slug)
        .execute(&mut *conn)
        .await
        .map_err(|err| match map_post_db_error(err) {
            DomainError::NotFound(_) => DomainError::NotFound(format!("category slug: {slug}")),
            other => other,
        })?;
    }
    Ok(())
}

fn map_row_to_post(row: PostRow, categories: Vec<Category>) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.title,
        row.slug,
        row.content,
        row.author_id,
        row.author_email,
        categories,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => return DomainError::AlreadyExists("post slug".to_string()),
            Some("23503") => {
                let resource = match db_err.constraint() {
                    Some("posts_author_id_fkey") => "author",
                    _ => "category",
                };
                return DomainError::NotFound(resource.to_string());
            }
            _ => {}
        }
    }
    DomainError::Unexpected(err.to_string())
}
