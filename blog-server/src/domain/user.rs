use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(UserRole::User),
            "ADMIN" => Ok(UserRole::Admin),
            _ => Err(DomainError::Validation {
                field: "role",
                message: "must be USER or ADMIN",
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) email: String,
    pub(crate) full_name: Option<String>,
    pub(crate) password: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let email = normalize_email(&self.email)?;
        let full_name = normalize_full_name(self.full_name)?;
        let password_len = self.password.chars().count();
        if !(8..=128).contains(&password_len) {
            return Err(DomainError::Validation {
                field: "password",
                message: "must be 8..128 chars",
            });
        }
        Ok(Self {
            email,
            full_name,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let email = self.email.trim();
        if email.is_empty() || email.len() > 255 {
            return Err(DomainError::Validation {
                field: "email",
                message: "must be 1..255 chars",
            });
        }

        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self {
            email: email.to_string(),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SetRoleRequest {
    pub(crate) user_email: String,
    pub(crate) role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) full_name: Option<String>,
    pub(crate) role: UserRole,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        email: impl Into<String>,
        full_name: Option<String>,
        role: UserRole,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let email = normalize_email(&email.into())?;

        Ok(Self {
            id,
            email,
            full_name,
            role,
            created_at,
        })
    }
}

// регистр email сохраняется как есть, уникальность тоже чувствительна к регистру
fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim();
    if email.len() > 255 || !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email.to_string())
}

fn normalize_full_name(full_name: Option<String>) -> Result<Option<String>, DomainError> {
    let Some(full_name) = full_name else {
        return Ok(None);
    };
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Ok(None);
    }
    if full_name.chars().count() > 150 {
        return Err(DomainError::Validation {
            field: "full_name",
            message: "must be at most 150 chars",
        });
    }
    Ok(Some(full_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{RegisterRequest, User, UserRole, normalize_email, normalize_full_name};
    use chrono::Utc;

    #[test]
    fn user_new_rejects_non_positive_id() {
        let result = User::new(0, "test@example.com", None, UserRole::User, Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn normalize_email_trims_but_keeps_case() {
        let value = normalize_email("  TeSt@Example.COM ").expect("must be valid");
        assert_eq!(value, "TeSt@Example.COM");
    }

    #[test]
    fn normalize_email_rejects_garbage() {
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("").is_err());
    }

    #[test]
    fn blank_full_name_becomes_none() {
        assert_eq!(normalize_full_name(Some("   ".to_string())).unwrap(), None);
        assert_eq!(
            normalize_full_name(Some(" Ada Lovelace ".to_string())).unwrap(),
            Some("Ada Lovelace".to_string())
        );
    }

    #[test]
    fn register_password_length_is_checked() {
        let short = RegisterRequest {
            email: "test@example.com".to_string(),
            full_name: None,
            password: "short".to_string(),
        };
        assert!(short.validate().is_err());

        let ok = RegisterRequest {
            email: " test@example.com ".to_string(),
            full_name: Some("Tester".to_string()),
            password: "very-secure-password".to_string(),
        };
        let validated = ok.validate().expect("must be valid");
        assert_eq!(validated.email, "test@example.com");
        assert_eq!(validated.full_name.as_deref(), Some("Tester"));
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(" USER ".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("root".parse::<UserRole>().is_err());
        assert_eq!(UserRole::default(), UserRole::User);
    }
}
