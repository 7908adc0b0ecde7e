//! Bearer-token authorizer: extract → verify/decode → check permission → invoke.
//!
//! This module is core-only: it knows nothing about axum routing. The axum
//! layer in `crate::middleware::auth` calls `Authorizer::authorize` and renders
//! failures at the boundary.

use std::{error::Error as _, fmt, future::Future, str::FromStr, sync::Arc, time::Duration};

use axum::http::{HeaderMap, StatusCode};
use jsonwebtoken::{Algorithm, Validation, errors::ErrorKind};
use tracing::warn;
use url::Url;

use super::bearer;
use super::claims::Claims;
use super::error::AuthError;
use super::jwks::{HttpKeySetSource, KeySetError, KeySetSource};

/// How failures are rendered to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RejectionPolicy {
    /// Surface the original code, status and description.
    #[default]
    Detailed,
    /// Bare 401 for any authentication failure, bare 403 for any permission
    /// failure. `key_set_unreachable` still renders as 503.
    Collapsed,
}

impl FromStr for RejectionPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "collapsed" => Ok(Self::Collapsed),
            _ => Err(()),
        }
    }
}

/// Explicit authorizer configuration.
///
/// Note: kept here (instead of depending on `Config`) so the core logic stays
/// testable and reusable outside the binary.
#[derive(Debug, Clone)]
pub struct AuthorizerConfig {
    // Identity provider domain, e.g. `tenant.us.auth0.com`.
    pub domain: String,
    pub audience: String,
    // RSA family only (`SUPPORTED_ALGORITHMS`): keys come from `n`/`e`.
    pub algorithms: Vec<Algorithm>,
    // Defaults to `https://<domain>/`.
    pub issuer: Option<String>,
    // Defaults to `https://<domain>/.well-known/jwks.json`.
    pub jwks_url: Option<String>,
    pub jwks_timeout: Duration,
    pub leeway_seconds: u64,
    pub rejection_policy: RejectionPolicy,
    // 400 or 403 when validated claims carry no `permissions`.
    pub missing_permissions_status: StatusCode,
}

impl AuthorizerConfig {
    /// Algorithms a key built from RSA public components can verify.
    pub const SUPPORTED_ALGORITHMS: [Algorithm; 6] = [
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::PS256,
        Algorithm::PS384,
        Algorithm::PS512,
    ];

    pub fn supports(algorithm: Algorithm) -> bool {
        Self::SUPPORTED_ALGORITHMS.contains(&algorithm)
    }

    pub fn new(domain: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            audience: audience.into(),
            algorithms: vec![Algorithm::RS256],
            issuer: None,
            jwks_url: None,
            jwks_timeout: Duration::from_secs(5),
            leeway_seconds: 0,
            rejection_policy: RejectionPolicy::Detailed,
            missing_permissions_status: StatusCode::FORBIDDEN,
        }
    }

    pub fn issuer(&self) -> String {
        self.issuer
            .clone()
            .unwrap_or_else(|| format!("https://{}/", self.domain))
    }

    pub fn jwks_url(&self) -> Result<Url, url::ParseError> {
        match &self.jwks_url {
            Some(url) => Url::parse(url),
            None => Url::parse(&format!("https://{}/.well-known/jwks.json", self.domain)),
        }
    }
}

#[derive(Clone)]
pub struct Authorizer {
    keys: Arc<dyn KeySetSource>,
    validation: Validation,
    rejection_policy: RejectionPolicy,
    missing_permissions_status: StatusCode,
}

impl fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorizer")
            .field("keys", &self.keys.origin())
            .field("validation", &self.validation)
            .field("rejection_policy", &self.rejection_policy)
            .finish()
    }
}

impl Authorizer {
    pub fn new(config: &AuthorizerConfig, keys: Arc<dyn KeySetSource>) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = config.algorithms.clone();
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_issuer(&[config.issuer()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        validation.leeway = config.leeway_seconds;

        Self {
            keys,
            validation,
            rejection_policy: config.rejection_policy,
            missing_permissions_status: config.missing_permissions_status,
        }
    }

    /// Build an authorizer that fetches keys from the configured JWKS URL.
    pub fn from_config(config: &AuthorizerConfig) -> Result<Self, KeySetError> {
        let source = HttpKeySetSource::new(config.jwks_url()?, config.jwks_timeout)?;
        Ok(Self::new(config, Arc::new(source)))
    }

    pub fn rejection_policy(&self) -> RejectionPolicy {
        self.rejection_policy
    }

    pub fn extract_token<'h>(&self, headers: &'h HeaderMap) -> Result<&'h str, AuthError> {
        bearer::extract_token(headers)
    }

    /// Verify the token signature against the current key set and validate
    /// `exp`, `aud` and `iss`.
    ///
    /// Claims are returned only when every check passes.
    pub async fn verify_decode(&self, token: &str) -> Result<Claims, AuthError> {
        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| AuthError::undecodable_token().with_source(e))?;

        let kid = header.kid.ok_or_else(|| {
            AuthError::invalid_header(StatusCode::UNAUTHORIZED, "Authorization malformed.")
        })?;

        let keys = self.keys.fetch().await.map_err(|e| {
            warn!(origin = %self.keys.origin(), error = %e, "key set fetch failed");
            AuthError::key_set_unreachable(e)
        })?;

        let key = keys.find_rsa(&kid).ok_or_else(|| {
            AuthError::invalid_header(
                StatusCode::BAD_REQUEST,
                "Unable to find the appropriate key.",
            )
        })?;

        let decoding_key = key
            .decoding_key()
            .map_err(|e| AuthError::undecodable_token().with_source(e))?;

        let data = jsonwebtoken::decode::<Claims>(token, &decoding_key, &self.validation)
            .map_err(classify_decode_error)?;

        Ok(data.claims)
    }

    /// Exact-string membership of `permission` in the `permissions` claim.
    pub fn check_permission(&self, permission: &str, claims: &Claims) -> Result<(), AuthError> {
        let mut granted = claims
            .permissions()
            .ok_or_else(|| AuthError::permissions_missing(self.missing_permissions_status))?;

        if granted.any(|p| p == permission) {
            Ok(())
        } else {
            Err(AuthError::unauthorized())
        }
    }

    /// Run the full chain and return the validated claims.
    ///
    /// Failures are logged here with their original code and status, whatever
    /// the rejection policy later renders.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        permission: &str,
    ) -> Result<Claims, AuthError> {
        let result = async {
            let token = self.extract_token(headers)?;
            let claims = self.verify_decode(token).await?;
            self.check_permission(permission, &claims)?;
            Ok::<_, AuthError>(claims)
        }
        .await;

        if let Err(err) = &result {
            warn!(
                code = %err.code(),
                status = err.status().as_u16(),
                stage = ?err.stage(),
                permission,
                error = %err,
                cause = err.source().map(tracing::field::display),
                "authorization rejected"
            );
        }

        result
    }

    /// Authorize, then invoke `operation` exactly once with the decoded claims.
    pub async fn invoke<F, Fut, T>(
        &self,
        headers: &HeaderMap,
        permission: &str,
        operation: F,
    ) -> Result<T, AuthError>
    where
        F: FnOnce(Claims) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(headers, permission).await?;
        Ok(operation(claims).await)
    }

    /// Wrap `operation` so it only runs for callers holding `permission`.
    pub fn guard<F>(self: &Arc<Self>, permission: impl Into<String>, operation: F) -> Guarded<F> {
        Guarded {
            authorizer: Arc::clone(self),
            permission: permission.into(),
            operation,
        }
    }
}

fn classify_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    let classified = match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::token_expired(),
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::invalid_claims(),
        _ => AuthError::undecodable_token(),
    };
    classified.with_source(err)
}

/// An operation that only runs after a successful authorization.
pub struct Guarded<F> {
    authorizer: Arc<Authorizer>,
    permission: String,
    operation: F,
}

impl<F> Guarded<F> {
    pub fn permission(&self) -> &str {
        &self.permission
    }
}

impl<F, Fut, T> Guarded<F>
where
    F: Fn(Claims) -> Fut,
    Fut: Future<Output = T>,
{
    pub async fn call(&self, headers: &HeaderMap) -> Result<T, AuthError> {
        self.authorizer
            .invoke(headers, &self.permission, &self.operation)
            .await
    }
}
