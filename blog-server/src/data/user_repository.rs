use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::{User, UserRole};

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) email: String,
    pub(crate) full_name: Option<String>,
    pub(crate) password_hash: String,
    pub(crate) role: UserRole,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError>;
    async fn update_role(&self, id: i64, role: UserRole) -> Result<Option<User>, DomainError>;
}
