/*
 * Responsibility
 * - GET/POST /api/v1/images
 * - 保護された operation の見本: 検証済み Claims をそのまま返す
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::api::v1::extractors::AuthClaims;

pub async fn list_images(AuthClaims(claims): AuthClaims) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "claims": claims })),
    )
}

pub async fn create_image(AuthClaims(claims): AuthClaims) -> impl IntoResponse {
    tracing::info!(sub = claims.subject().unwrap_or("-"), "image created");
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "claims": claims })),
    )
}
