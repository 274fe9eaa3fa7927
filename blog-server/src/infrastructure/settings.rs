use anyhow::{Context, Result, anyhow};

/// Signing key and lifetimes for issued tokens. Built once at startup, read-only afterwards.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub tokens: TokenSettings,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub http_request_timeout_secs: u64,
    pub bootstrap_admin_email: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let jwt_secret = get_required("JWT_SECRET").context("JWT_SECRET is required")?;
        let access_ttl_seconds = parse_i64_env("JWT_ACCESS_TTL_SECONDS", 15 * 60)?;
        let refresh_ttl_seconds = parse_i64_env("JWT_REFRESH_TTL_SECONDS", 30 * 24 * 60 * 60)?;

        let tokens = TokenSettings::new(jwt_secret, access_ttl_seconds, refresh_ttl_seconds)?;

        let database_max_connections = parse_usize_env("DATABASE_MAX_CONNECTIONS", 10)?;
        let database_max_connections = u32::try_from(database_max_connections)
            .context("DATABASE_MAX_CONNECTIONS is too large")?;
        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:8000,http://127.0.0.1:8000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_concurrency_limit = parse_usize_env("HTTP_CONCURRENCY_LIMIT", 256)?;
        let http_request_timeout_secs = parse_u64_env("HTTP_REQUEST_TIMEOUT_SECS", 10)?;
        let bootstrap_admin_email = get_required("BOOTSTRAP_ADMIN_EMAIL").ok();

        Ok(Self {
            database_url,
            database_max_connections,
            tokens,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
            bootstrap_admin_email,
        })
    }
}

impl TokenSettings {
    /// Ten years.
    pub const MAX_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

    pub fn new(
        secret: impl Into<String>,
        access_ttl_seconds: i64,
        refresh_ttl_seconds: i64,
    ) -> Result<Self> {
        let secret = secret.into();
        if secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }
        if access_ttl_seconds <= 0 || refresh_ttl_seconds <= 0 {
            return Err(anyhow!("token lifetimes must be > 0"));
        }
        if access_ttl_seconds > Self::MAX_TTL_SECONDS || refresh_ttl_seconds > Self::MAX_TTL_SECONDS
        {
            return Err(anyhow!(
                "token lifetimes must not exceed {} seconds",
                Self::MAX_TTL_SECONDS
            ));
        }
        if refresh_ttl_seconds <= access_ttl_seconds {
            return Err(anyhow!(
                "JWT_REFRESH_TTL_SECONDS must be greater than JWT_ACCESS_TTL_SECONDS"
            ));
        }

        Ok(Self {
            secret,
            access_ttl_seconds,
            refresh_ttl_seconds,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_i64_env(key: &str, default: i64) -> Result<i64> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<i64>()
        .with_context(|| format!("Failed to parse {key}, expecting integer"))
}
