use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::slug::normalize_slug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Category {
    pub(crate) slug: String,
    pub(crate) name: String,
}

impl Category {
    pub(crate) fn new(slug: &str, name: &str) -> Result<Self, DomainError> {
        Ok(Self {
            slug: normalize_category_slug(slug)?,
            name: normalize_name(name)?,
        })
    }

    /// Overwrites every field present in `patch`; absent fields keep their values.
    pub(crate) fn apply(mut self, patch: CategoryPatch) -> Result<Self, DomainError> {
        if let Some(name) = patch.name {
            self.name = normalize_name(&name)?;
        }
        if let Some(slug) = patch.slug {
            self.slug = normalize_category_slug(&slug)?;
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreateCategoryRequest {
    pub(crate) name: String,
    pub(crate) slug: String,
}

impl CreateCategoryRequest {
    pub(crate) fn into_category(self) -> Result<Category, DomainError> {
        Category::new(&self.slug, &self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CategoryPatch {
    pub(crate) name: Option<String>,
    pub(crate) slug: Option<String>,
}

impl From<CreateCategoryRequest> for CategoryPatch {
    fn from(req: CreateCategoryRequest) -> Self {
        Self {
            name: Some(req.name),
            slug: Some(req.slug),
        }
    }
}

pub(crate) fn normalize_category_slug(raw: &str) -> Result<String, DomainError> {
    let slug = normalize_slug(raw);
    if slug.is_empty() || slug.chars().count() > 150 {
        return Err(DomainError::Validation {
            field: "slug",
            message: "must contain 1..150 word characters",
        });
    }
    Ok(slug)
}

fn normalize_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 150 {
        return Err(DomainError::Validation {
            field: "name",
            message: "must be 1..150 chars",
        });
    }
    Ok(name.to_string())
}
