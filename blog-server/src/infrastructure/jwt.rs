use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::settings::TokenSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Reasons a token is rejected. Callers collapse these into one authentication
/// failure; the variant is kept for logs.
#[derive(Debug, Error)]
pub(crate) enum TokenError {
    #[error("token is missing")]
    Missing,

    #[error("token is malformed")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("expected {expected} token, got {found} token")]
    WrongType { expected: TokenKind, found: TokenKind },

    #[error("token lifetime out of range")]
    Lifetime,

    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            TokenError::Missing => "missing",
            TokenError::Malformed(_) => "malformed",
            TokenError::BadSignature => "bad_signature",
            TokenError::Expired => "expired",
            TokenError::WrongType { .. } => "wrong_type",
            TokenError::Lifetime => "lifetime",
            TokenError::Encode(_) => "encode",
        }
    }

    fn from_decode(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed(err),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    #[serde(rename = "type")]
    pub(crate) kind: TokenKind,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    pub(crate) jti: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TokenPair {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
}

pub(crate) struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl TokenService {
    const LEEWAY_SECONDS: u64 = 10;

    pub(crate) fn new(settings: &TokenSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            access_ttl_seconds: settings.access_ttl_seconds,
            refresh_ttl_seconds: settings.refresh_ttl_seconds,
        }
    }

    pub(crate) fn issue_access_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, TokenKind::Access, self.access_ttl_seconds)
    }

    pub(crate) fn issue_refresh_token(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, TokenKind::Refresh, self.refresh_ttl_seconds)
    }

    pub(crate) fn issue_pair(&self, subject: &str) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(subject)?,
            refresh_token: self.issue_refresh_token(subject)?,
        })
    }

    /// Checks signature, expiry and type; returns the subject on success.
    pub(crate) fn verify(&self, token: &str, expected: TokenKind) -> Result<String, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = Self::LEEWAY_SECONDS;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(TokenError::from_decode)?
            .claims;

        if claims.kind != expected {
            return Err(TokenError::WrongType {
                expected,
                found: claims.kind,
            });
        }
        Ok(claims.sub)
    }

    fn issue(&self, subject: &str, kind: TokenKind, ttl_seconds: i64) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = Duration::try_seconds(ttl_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(TokenError::Lifetime)?;
        let claims = Claims {
            sub: subject.to_string(),
            kind,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encode)
    }
}
