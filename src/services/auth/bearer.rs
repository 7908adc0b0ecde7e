/*
 * Responsibility
 * - `Authorization: Bearer <token>` ヘッダから token を取り出す
 * - 形式の検査だけを行う (署名検証は authorizer 側)
 */
use axum::http::{HeaderMap, StatusCode, header};

use super::error::AuthError;

/// Extract the raw bearer token from request headers.
///
/// The header value is split on whitespace and must be exactly
/// `<scheme> <token>` with a case-insensitive `bearer` scheme. The scheme is
/// checked before the part count, so `Basic` is reported as a wrong scheme
/// regardless of how many parts follow it.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = match headers.get(header::AUTHORIZATION) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(AuthError::header_missing()),
    };

    let auth = value.to_str().map_err(|e| {
        AuthError::invalid_header(
            StatusCode::UNAUTHORIZED,
            "Authorization header is malformed.",
        )
        .with_source(e)
    })?;

    let parts: Vec<&str> = auth.split_ascii_whitespace().collect();

    match parts.as_slice() {
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::invalid_header(
            StatusCode::UNAUTHORIZED,
            "Authorization header must start with \"Bearer\".",
        )),
        [] => Err(AuthError::invalid_header(
            StatusCode::UNAUTHORIZED,
            "Authorization header must start with \"Bearer\".",
        )),
        [_] => Err(AuthError::invalid_header(
            StatusCode::UNAUTHORIZED,
            "Token not found.",
        )),
        [_, token] => Ok(*token),
        _ => Err(AuthError::invalid_header(
            StatusCode::UNAUTHORIZED,
            "Authorization header must be bearer token.",
        )),
    }
}
