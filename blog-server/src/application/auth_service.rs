use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::{info, warn};

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::access::require_admin;
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, SetRoleRequest, User, UserRole};
use crate::infrastructure::jwt::{TokenError, TokenKind, TokenPair, TokenService};

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    tokens: Arc<TokenService>,
}

impl<R: UserRepository> AuthService<R> {
    pub(crate) fn new(repo: R, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<TokenPair, DomainError> {
        let req = req.validate()?;

        if self.repo.find_by_email(&req.email).await?.is_some() {
            return Err(DomainError::AlreadyExists(format!(
                "user with email '{}'",
                req.email
            )));
        }

        let password_hash = self.hash_password(&req.password)?;
        let user = self
            .repo
            .create_user(Self::into_new_user(req, password_hash))
            .await?;

        info!(user_id = user.id, "user registered");
        self.issue_tokens(&user)
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<TokenPair, DomainError> {
        let req = req.validate()?;

        let user_creds = self
            .repo
            .find_by_email(&req.email)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user with email '{}'", req.email)))?;

        self.verify_password(&req.password, &user_creds.password_hash)?;
        self.issue_tokens(&user_creds.user)
    }

    /// Exchanges a refresh token for a new pair. The header token is tried first;
    /// the body token is only consulted when the header one is absent or rejected.
    pub(crate) async fn refresh(
        &self,
        header_token: Option<&str>,
        body_token: Option<&str>,
    ) -> Result<TokenPair, DomainError> {
        let from_header = header_token
            .ok_or(TokenError::Missing)
            .and_then(|token| self.tokens.verify(token, TokenKind::Refresh));

        let subject = match from_header {
            Ok(subject) => subject,
            Err(header_err) => match body_token {
                Some(token) => self
                    .tokens
                    .verify(token, TokenKind::Refresh)
                    .map_err(|err| reject_refresh(err, "body"))?,
                None => return Err(reject_refresh(header_err, "header")),
            },
        };

        self.tokens
            .issue_pair(&subject)
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }

    pub(crate) async fn set_role(
        &self,
        actor: &User,
        req: SetRoleRequest,
    ) -> Result<User, DomainError> {
        if let Err(err) = require_admin(actor) {
            warn!(actor_id = actor.id, "role change denied");
            return Err(err);
        }

        let email = req.user_email.trim();
        let target = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user with email '{email}'")))?;

        let updated = self
            .repo
            .update_role(target.user.id, req.role)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user with email '{email}'")))?;

        info!(
            actor_id = actor.id,
            target_id = updated.id,
            role = %updated.role,
            "user role changed"
        );
        Ok(updated)
    }

    /// Promotes an already registered user to admin; `None` if no such user.
    pub(crate) async fn promote_to_admin(&self, email: &str) -> Result<Option<User>, DomainError> {
        let Some(creds) = self.repo.find_by_email(email.trim()).await? else {
            return Ok(None);
        };
        if creds.user.role == UserRole::Admin {
            return Ok(Some(creds.user));
        }
        self.repo.update_role(creds.user.id, UserRole::Admin).await
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Self::argon2()?
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Unexpected(err.to_string()),
            })?;

        Ok(())
    }

    fn issue_tokens(&self, user: &User) -> Result<TokenPair, DomainError> {
        self.tokens
            .issue_pair(&user.id.to_string())
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }

    fn into_new_user(req: RegisterRequest, password_hash: String) -> NewUser {
        NewUser {
            email: req.email,
            full_name: req.full_name,
            password_hash,
            role: UserRole::User,
        }
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

fn reject_refresh(err: TokenError, source: &'static str) -> DomainError {
    warn!(kind = err.kind(), source, "refresh token rejected");
    DomainError::InvalidToken(err.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::AuthService;
    use crate::data::repositories::in_memory::InMemoryStore;
    use crate::data::user_repository::UserRepository;
    use crate::domain::error::DomainError;
    use crate::domain::user::{LoginRequest, RegisterRequest, SetRoleRequest, UserRole};
    use crate::infrastructure::jwt::{TokenKind, TokenService};
    use crate::infrastructure::settings::TokenSettings;

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(
            &TokenSettings::new("0123456789abcdef0123456789abcdef", 900, 3600)
                .expect("valid settings"),
        ))
    }

    fn service(store: &InMemoryStore) -> AuthService<InMemoryStore> {
        AuthService::new(store.clone(), tokens())
    }

    fn register_req(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            full_name: Some("Test User".to_string()),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_creates_user_with_hashed_password_and_returns_tokens() {
        let store = InMemoryStore::new();
        let service = service(&store);

        let pair = service
            .register(register_req("  a@x.com ", "correct-password"))
            .await
            .expect("register must succeed");

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
        assert_ne!(pair.access_token, pair.refresh_token);

        let creds = store
            .find_by_email("a@x.com")
            .await
            .expect("lookup must succeed")
            .expect("user must exist");
        assert_eq!(creds.user.role, UserRole::User);
        assert_eq!(creds.user.full_name.as_deref(), Some("Test User"));
        assert_ne!(creds.password_hash, "correct-password");
        assert!(creds.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn register_twice_with_same_email_is_a_conflict() {
        let store = InMemoryStore::new();
        let service = service(&store);

        service
            .register(register_req("a@x.com", "first-password"))
            .await
            .expect("first register must succeed");
        let err = service
            .register(register_req("a@x.com", "second-password"))
            .await
            .expect_err("second register must fail");

        assert!(matches!(err, DomainError::AlreadyExists(_)));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn login_with_correct_password_returns_two_distinct_tokens() {
        let store = InMemoryStore::new();
        let service = service(&store);
        service
            .register(register_req("a@x.com", "p-password"))
            .await
            .expect("register must succeed");

        let pair = service
            .login(LoginRequest {
                email: "a@x.com".to_string(),
                password: "p-password".to_string(),
            })
            .await
            .expect("login must succeed");

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let store = InMemoryStore::new();
        let service = service(&store);
        service
            .register(register_req("a@x.com", "p-password"))
            .await
            .expect("register must succeed");

        for wrong in ["P-password", "p-password ", "other-password", "x"] {
            let err = service
                .login(LoginRequest {
                    email: "a@x.com".to_string(),
                    password: wrong.to_string(),
                })
                .await
                .expect_err("login must fail");
            assert!(matches!(err, DomainError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_not_found() {
        let store = InMemoryStore::new();
        let service = service(&store);

        let err = service
            .login(LoginRequest {
                email: "ghost@x.com".to_string(),
                password: "whatever".to_string(),
            })
            .await
            .expect_err("login must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn refresh_prefers_header_token() {
        let store = InMemoryStore::new();
        let tokens = tokens();
        let service = AuthService::new(store, tokens.clone());
        let header = tokens.issue_refresh_token("1").expect("must issue");
        let body = tokens.issue_refresh_token("2").expect("must issue");

        let pair = service
            .refresh(Some(&header), Some(&body))
            .await
            .expect("refresh must succeed");

        let subject = tokens
            .verify(&pair.access_token, TokenKind::Access)
            .expect("new access token must verify");
        assert_eq!(subject, "1");
    }

    #[tokio::test]
    async fn refresh_falls_back_to_body_when_header_is_bad() {
        let store = InMemoryStore::new();
        let tokens = tokens();
        let service = AuthService::new(store, tokens.clone());
        let access = tokens.issue_access_token("1").expect("must issue");
        let body = tokens.issue_refresh_token("2").expect("must issue");

        for header in [None, Some("garbage"), Some(access.as_str())] {
            let pair = service
                .refresh(header, Some(&body))
                .await
                .expect("fallback must succeed");
            let subject = tokens
                .verify(&pair.refresh_token, TokenKind::Refresh)
                .expect("new refresh token must verify");
            assert_eq!(subject, "2");
        }
    }

    #[tokio::test]
    async fn refresh_fails_when_both_sources_fail() {
        let store = InMemoryStore::new();
        let tokens = tokens();
        let service = AuthService::new(store, tokens.clone());
        let access = tokens.issue_access_token("1").expect("must issue");

        let err = service
            .refresh(Some("garbage"), Some(&access))
            .await
            .expect_err("refresh must fail");
        match err {
            DomainError::InvalidToken(message) => {
                assert!(message.contains("expected refresh token"), "{message}")
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = service
            .refresh(None, None)
            .await
            .expect_err("refresh must fail");
        assert!(matches!(err, DomainError::InvalidToken(_)));
        assert_eq!(err.kind(), "InvalidTokenError");
    }

    #[tokio::test]
    async fn set_role_requires_admin() {
        let store = InMemoryStore::new();
        let service = service(&store);
        let actor = store.seed_user("plain@x.com", UserRole::User);
        store.seed_user("target@x.com", UserRole::User);

        let err = service
            .set_role(
                &actor,
                SetRoleRequest {
                    user_email: "target@x.com".to_string(),
                    role: UserRole::Admin,
                },
            )
            .await
            .expect_err("must be forbidden");

        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(store.role_of("target@x.com"), Some(UserRole::User));
    }

    #[tokio::test]
    async fn set_role_updates_target() {
        let store = InMemoryStore::new();
        let service = service(&store);
        let admin = store.seed_user("admin@x.com", UserRole::Admin);
        store.seed_user("target@x.com", UserRole::User);

        let updated = service
            .set_role(
                &admin,
                SetRoleRequest {
                    user_email: "target@x.com".to_string(),
                    role: UserRole::Admin,
                },
            )
            .await
            .expect("set_role must succeed");

        assert_eq!(updated.role, UserRole::Admin);
        assert_eq!(store.role_of("target@x.com"), Some(UserRole::Admin));
    }

    #[tokio::test]
    async fn set_role_for_missing_target_changes_nothing() {
        let store = InMemoryStore::new();
        let service = service(&store);
        let admin = store.seed_user("admin@x.com", UserRole::Admin);
        store.seed_user("other@x.com", UserRole::User);

        let err = service
            .set_role(
                &admin,
                SetRoleRequest {
                    user_email: "ghost@x.com".to_string(),
                    role: UserRole::Admin,
                },
            )
            .await
            .expect_err("must be not found");

        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(store.role_of("admin@x.com"), Some(UserRole::Admin));
        assert_eq!(store.role_of("other@x.com"), Some(UserRole::User));
    }

    #[tokio::test]
    async fn promote_to_admin_is_noop_for_unknown_email() {
        let store = InMemoryStore::new();
        let service = service(&store);
        store.seed_user("boss@x.com", UserRole::User);

        assert!(
            service
                .promote_to_admin("nobody@x.com")
                .await
                .expect("must not fail")
                .is_none()
        );

        let promoted = service
            .promote_to_admin("boss@x.com")
            .await
            .expect("must not fail")
            .expect("user must exist");
        assert_eq!(promoted.role, UserRole::Admin);
    }
}
