//! JSON Web Key Set types and the sources they are fetched from.
//!
//! The key set is fetched on every verification and never cached: its
//! lifetime is a single `Authorizer::verify_decode` call.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("key set request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid key set url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// `{ "keys": [...] }` as published at `/.well-known/jwks.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    #[serde(default)]
    pub keys: Vec<JsonWebKey>,
}

/// One public key entry.
///
/// Only the RSA public components are used; other members of the JWK are
/// accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
}

impl KeySet {
    /// First RSA key whose `kid` equals `kid` and which carries both `n` and `e`.
    pub fn find_rsa(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|k| {
            k.kid.as_deref() == Some(kid) && k.kty == "RSA" && k.n.is_some() && k.e.is_some()
        })
    }
}

impl JsonWebKey {
    pub fn rsa(kid: impl Into<String>, n: impl Into<String>, e: impl Into<String>) -> Self {
        Self {
            kty: "RSA".to_string(),
            kid: Some(kid.into()),
            key_use: Some("sig".to_string()),
            alg: Some("RS256".to_string()),
            n: Some(n.into()),
            e: Some(e.into()),
        }
    }

    pub fn decoding_key(&self) -> Result<DecodingKey, jsonwebtoken::errors::Error> {
        let n = self.n.as_deref().unwrap_or_default();
        let e = self.e.as_deref().unwrap_or_default();
        DecodingKey::from_rsa_components(n, e)
    }
}

/// Where verification keys come from.
///
/// Implementations must not cache across calls unless the deployment
/// explicitly pins its keys (as `KeySet` itself does).
#[async_trait]
pub trait KeySetSource: Send + Sync {
    // Human-readable origin (for logging).
    fn origin(&self) -> &str;

    async fn fetch(&self) -> Result<KeySet, KeySetError>;
}

/// A fixed set of keys.
#[async_trait]
impl KeySetSource for KeySet {
    fn origin(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<KeySet, KeySetError> {
        Ok(self.clone())
    }
}

/// Fetches the key set over HTTP(S) on every call.
#[derive(Debug, Clone)]
pub struct HttpKeySetSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpKeySetSource {
    /// Build a source with an explicit request timeout.
    ///
    /// The timeout covers the whole request (connect + body).
    pub fn new(url: Url, timeout: Duration) -> Result<Self, KeySetError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl KeySetSource for HttpKeySetSource {
    fn origin(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch(&self) -> Result<KeySet, KeySetError> {
        debug!(url = %self.url, "fetching key set");

        let keys = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<KeySet>()
            .await?;

        debug!(url = %self.url, count = keys.keys.len(), "fetched key set");
        Ok(keys)
    }
}
