use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::{Category, normalize_category_slug};
use super::error::DomainError;
use super::slug::normalize_slug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) content: String,
    pub(crate) author_id: i64,
    pub(crate) author_email: String,
    pub(crate) categories: Vec<Category>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) slug: Option<String>,
    pub(crate) content: String,
    pub(crate) categories: Vec<String>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let title = normalize_title(&self.title)?;
        let slug_source = match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => title.clone(),
        };
        Ok(Self {
            slug: Some(normalize_post_slug(&slug_source)?),
            title,
            content: normalize_content(&self.content)?,
            categories: normalize_category_slugs(self.categories)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) categories: Vec<String>,
}

impl From<UpdatePostRequest> for PostPatch {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: Some(req.title),
            content: Some(req.content),
            categories: Some(req.categories),
        }
    }
}

/// Partial update as sent by a client: categories are referenced by slug.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct PostPatch {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) categories: Option<Vec<String>>,
}

impl PostPatch {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: self.title.as_deref().map(normalize_title).transpose()?,
            content: self.content.as_deref().map(normalize_content).transpose()?,
            categories: self.categories.map(normalize_category_slugs).transpose()?,
        })
    }
}

/// Validated partial update with categories already resolved to rows.
#[derive(Debug, Clone, Default)]
pub(crate) struct PostChanges {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) categories: Option<Vec<Category>>,
}

impl Post {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: i64,
        title: impl Into<String>,
        slug: impl Into<String>,
        content: impl Into<String>,
        author_id: i64,
        author_email: impl Into<String>,
        categories: Vec<Category>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("author_id", author_id)?;
        let title = normalize_title(&title.into())?;
        let slug = normalize_post_slug(&slug.into())?;
        let content = normalize_content(&content.into())?;

        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            title,
            slug,
            content,
            author_id,
            author_email: author_email.into(),
            categories,
            created_at,
            updated_at,
        })
    }

    /// Overwrites every field present in `changes`; absent fields keep their values.
    /// Author and slug are never touched.
    pub(crate) fn apply(mut self, changes: PostChanges) -> Self {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(categories) = changes.categories {
            self.categories = categories;
        }
        self
    }

    pub(crate) fn category_slugs(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|category| category.slug.clone())
            .collect()
    }
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 255 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_post_slug(raw: &str) -> Result<String, DomainError> {
    let slug = normalize_slug(raw);
    if slug.is_empty() || slug.chars().count() > 255 {
        return Err(DomainError::Validation {
            field: "slug",
            message: "must contain 1..255 word characters",
        });
    }
    Ok(slug)
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    Ok(content.to_string())
}

fn normalize_category_slugs(slugs: Vec<String>) -> Result<Vec<String>, DomainError> {
    let mut normalized: Vec<String> = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let slug = normalize_category_slug(&slug)?;
        if !normalized.contains(&slug) {
            normalized.push(slug);
        }
    }
    Ok(normalized)
}
