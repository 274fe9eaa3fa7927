use tracing::debug;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::User;
use crate::infrastructure::jwt::{TokenKind, TokenService};

/// Maps a verified token subject to the stored user. Holds its own repository
/// handle, so it can be called from any task.
pub(crate) struct PrincipalResolver<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> PrincipalResolver<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn resolve(&self, subject: &str) -> Result<User, DomainError> {
        let user_id: i64 = subject
            .trim()
            .parse()
            .map_err(|_| DomainError::Validation {
                field: "sub",
                message: "Invalid token, please login again",
            })?;

        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {user_id}")))
    }

    /// Verifies an access token and loads its owner.
    pub(crate) async fn authenticate(
        &self,
        tokens: &TokenService,
        access_token: &str,
    ) -> Result<User, DomainError> {
        let subject = tokens
            .verify(access_token, TokenKind::Access)
            .map_err(|err| {
                debug!(kind = err.kind(), "access token rejected");
                DomainError::InvalidToken(err.to_string())
            })?;
        self.resolve(&subject).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::PrincipalResolver;
    use crate::data::repositories::in_memory::InMemoryStore;
    use crate::domain::error::DomainError;
    use crate::domain::user::UserRole;
    use crate::infrastructure::jwt::TokenService;
    use crate::infrastructure::settings::TokenSettings;

    fn tokens() -> TokenService {
        TokenService::new(
            &TokenSettings::new("0123456789abcdef0123456789abcdef", 900, 3600)
                .expect("valid settings"),
        )
    }

    #[tokio::test]
    async fn resolve_loads_user_by_subject() {
        let store = InMemoryStore::new();
        let user = store.seed_user("a@x.com", UserRole::User);
        let resolver = PrincipalResolver::new(store);

        let resolved = resolver
            .resolve(&user.id.to_string())
            .await
            .expect("must resolve");
        assert_eq!(resolved, user);
    }

    #[tokio::test]
    async fn resolve_rejects_non_integer_subject() {
        let resolver = PrincipalResolver::new(InMemoryStore::new());

        for subject in ["", "abc", "1.5", "0x10"] {
            let err = resolver
                .resolve(subject)
                .await
                .expect_err("must be malformed");
            assert!(matches!(err, DomainError::Validation { field: "sub", .. }));
        }
    }

    #[tokio::test]
    async fn resolve_reports_missing_user() {
        let resolver = PrincipalResolver::new(InMemoryStore::new());

        let err = resolver.resolve("404").await.expect_err("must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn authenticate_round_trips_issued_access_token() {
        let store = InMemoryStore::new();
        let user = store.seed_user("a@x.com", UserRole::Admin);
        let resolver = PrincipalResolver::new(store);
        let tokens = tokens();

        let token = tokens
            .issue_access_token(&user.id.to_string())
            .expect("must issue");
        let resolved = resolver
            .authenticate(&tokens, &token)
            .await
            .expect("must authenticate");
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn authenticate_rejects_refresh_token() {
        let store = InMemoryStore::new();
        let user = store.seed_user("a@x.com", UserRole::Admin);
        let resolver = PrincipalResolver::new(store);
        let tokens = tokens();

        let token = tokens
            .issue_refresh_token(&user.id.to_string())
            .expect("must issue");
        let err = resolver
            .authenticate(&tokens, &token)
            .await
            .expect_err("refresh token must not authenticate");
        assert!(matches!(err, DomainError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn resolve_runs_on_another_task() {
        let store = InMemoryStore::new();
        let user = store.seed_user("a@x.com", UserRole::User);
        let resolver = Arc::new(PrincipalResolver::new(store));

        let subject = user.id.to_string();
        let handle = tokio::spawn({
            let resolver = Arc::clone(&resolver);
            async move { resolver.resolve(&subject).await }
        });

        let resolved = handle
            .await
            .expect("task must not panic")
            .expect("must resolve");
        assert_eq!(resolved.id, user.id);
    }
}
