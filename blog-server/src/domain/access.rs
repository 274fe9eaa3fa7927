//! Role and ownership checks applied before any content or role mutation.

use super::error::DomainError;
use super::post::Post;
use super::user::{User, UserRole};

pub(crate) const NOT_ADMIN_MESSAGE: &str =
    "You do not have sufficient rights to perform this action";
pub(crate) const NOT_AUTHOR_MESSAGE: &str = "Only author of a post can edit it";

pub(crate) fn is_admin(user: &User) -> bool {
    user.role == UserRole::Admin
}

pub(crate) fn require_admin(user: &User) -> Result<(), DomainError> {
    if !is_admin(user) {
        return Err(DomainError::Forbidden(NOT_ADMIN_MESSAGE));
    }
    Ok(())
}

pub(crate) fn require_author(user: &User, post: &Post) -> Result<(), DomainError> {
    if post.author_id != user.id {
        return Err(DomainError::Forbidden(NOT_AUTHOR_MESSAGE));
    }
    Ok(())
}

/// Post edits need both: the role may have been revoked after the post was written.
pub(crate) fn require_admin_author(user: &User, post: &Post) -> Result<(), DomainError> {
    require_admin(user)?;
    require_author(user, post)
}
