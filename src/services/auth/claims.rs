use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded, validated token claims.
///
/// Kept as the raw claim map so every claim the identity provider issued is
/// handed to the protected operation exactly as encoded. Only produced by
/// `Authorizer::verify_decode` after signature, `exp`, `aud` and `iss` checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }

    pub fn issuer(&self) -> Option<&str> {
        self.0.get("iss").and_then(Value::as_str)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp = self.0.get("exp")?;
        let secs = exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))?;
        DateTime::from_timestamp(secs, 0)
    }

    /// String entries of the `permissions` claim.
    ///
    /// `None` when the claim is absent or is not an array; non-string entries
    /// are skipped.
    pub fn permissions(&self) -> Option<impl Iterator<Item = &str>> {
        match self.0.get("permissions") {
            Some(Value::Array(items)) => Some(items.iter().filter_map(Value::as_str)),
            _ => None,
        }
    }
}
