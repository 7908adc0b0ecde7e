/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, AUTH_DOMAIN, AUTH_AUDIENCE など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - Authorizer に渡す AuthorizerConfig を組み立てる
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::StatusCode;
use jsonwebtoken::Algorithm;

use crate::services::auth::{AuthorizerConfig, RejectionPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub auth: AuthorizerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match non_empty("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let domain = non_empty("AUTH_DOMAIN").ok_or(ConfigError::Missing("AUTH_DOMAIN"))?;
        let audience = non_empty("AUTH_AUDIENCE").ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        let mut auth = AuthorizerConfig::new(domain.trim(), audience.trim());

        if let Some(raw) = non_empty("AUTH_ALGORITHMS") {
            auth.algorithms = parse_algorithms(&raw)?;
        }

        auth.issuer = non_empty("AUTH_ISSUER");
        auth.jwks_url = non_empty("AUTH_JWKS_URL");
        // Validate the (possibly derived) url up front so a typo fails startup.
        auth.jwks_url()
            .map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?;

        if let Some(v) = non_empty("AUTH_JWKS_TIMEOUT_SECONDS") {
            let secs: u64 = v
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::Invalid("AUTH_JWKS_TIMEOUT_SECONDS"))?;
            auth.jwks_timeout = Duration::from_secs(secs);
        }

        if let Some(v) = non_empty("AUTH_LEEWAY_SECONDS") {
            auth.leeway_seconds = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("AUTH_LEEWAY_SECONDS"))?;
        }

        if let Some(v) = non_empty("AUTH_REJECTION_POLICY") {
            auth.rejection_policy = v
                .parse::<RejectionPolicy>()
                .map_err(|_| ConfigError::Invalid("AUTH_REJECTION_POLICY"))?;
        }

        if let Some(v) = non_empty("AUTH_MISSING_PERMISSIONS_STATUS") {
            auth.missing_permissions_status = match v.trim() {
                "400" => StatusCode::BAD_REQUEST,
                "403" => StatusCode::FORBIDDEN,
                _ => return Err(ConfigError::Invalid("AUTH_MISSING_PERMISSIONS_STATUS")),
            };
        }

        Ok(Self {
            addr,
            app_env,
            auth,
        })
    }
}

// Comma-separated, e.g. "RS256" or "RS256,PS256". RSA family only.
fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Algorithm::from_str(s)
                .ok()
                .filter(|alg| AuthorizerConfig::supports(*alg))
        })
        .collect::<Option<Vec<_>>>()
        .ok_or(ConfigError::Invalid("AUTH_ALGORITHMS"))?;

    if algorithms.is_empty() {
        return Err(ConfigError::Invalid("AUTH_ALGORITHMS"));
    }
    Ok(algorithms)
}
