//! Authorization failure taxonomy.
//!
//! Every failure of the authorizer is an `AuthError` carrying a machine-readable
//! code, the HTTP status it maps to, and a short human description. Rendering to
//! an HTTP response happens only at the outer boundary (`crate::error::AppError`).

use std::{borrow::Cow, error::Error as StdError, fmt};

use axum::http::StatusCode;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorCode {
    AuthorizationHeaderMissing,
    InvalidHeader,
    TokenExpired,
    InvalidClaims,
    Unauthorized,
    KeySetUnreachable,
}

impl AuthErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationHeaderMissing => "authorization_header_missing",
            Self::InvalidHeader => "invalid_header",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims => "invalid_claims",
            Self::Unauthorized => "unauthorized",
            Self::KeySetUnreachable => "key_set_unreachable",
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The step of the chain that produced a failure.
///
/// - `Authentication`: header extraction, key lookup, signature/claims validation
/// - `Authorization`: the permission check on already-validated claims
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    Authentication,
    Authorization,
}

#[derive(Debug, thiserror::Error)]
#[error("{code}: {description}")]
pub struct AuthError {
    code: AuthErrorCode,
    status: StatusCode,
    stage: AuthStage,
    description: Cow<'static, str>,
    #[source]
    source: Option<BoxError>,
}

impl AuthError {
    fn new(
        code: AuthErrorCode,
        status: StatusCode,
        stage: AuthStage,
        description: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            code,
            status,
            stage,
            description: description.into(),
            source: None,
        }
    }

    pub fn header_missing() -> Self {
        Self::new(
            AuthErrorCode::AuthorizationHeaderMissing,
            StatusCode::UNAUTHORIZED,
            AuthStage::Authentication,
            "Authorization header is expected.",
        )
    }

    /// `invalid_header` is 401 for a malformed `Authorization` header or a token
    /// without `kid`, and 400 when the token itself cannot be processed.
    pub fn invalid_header(status: StatusCode, description: impl Into<Cow<'static, str>>) -> Self {
        Self::new(
            AuthErrorCode::InvalidHeader,
            status,
            AuthStage::Authentication,
            description,
        )
    }

    pub fn undecodable_token() -> Self {
        Self::invalid_header(
            StatusCode::BAD_REQUEST,
            "Unable to parse authentication token.",
        )
    }

    pub fn token_expired() -> Self {
        Self::new(
            AuthErrorCode::TokenExpired,
            StatusCode::UNAUTHORIZED,
            AuthStage::Authentication,
            "Token expired.",
        )
    }

    /// Audience / issuer mismatch or a missing registered claim.
    pub fn invalid_claims() -> Self {
        Self::new(
            AuthErrorCode::InvalidClaims,
            StatusCode::UNAUTHORIZED,
            AuthStage::Authentication,
            "Incorrect claims. Please, check the audience and issuer.",
        )
    }

    /// Validated claims carry no usable `permissions` list.
    pub fn permissions_missing(status: StatusCode) -> Self {
        Self::new(
            AuthErrorCode::InvalidClaims,
            status,
            AuthStage::Authorization,
            "Permissions not included in JWT.",
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(
            AuthErrorCode::Unauthorized,
            StatusCode::FORBIDDEN,
            AuthStage::Authorization,
            "Permission not found.",
        )
    }

    pub fn key_set_unreachable(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::new(
            AuthErrorCode::KeySetUnreachable,
            StatusCode::SERVICE_UNAVAILABLE,
            AuthStage::Authentication,
            "Unable to fetch signing keys.",
        )
        .with_source(source)
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> AuthErrorCode {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn stage(&self) -> AuthStage {
        self.stage
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
