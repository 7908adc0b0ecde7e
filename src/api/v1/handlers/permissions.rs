use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::AuthClaims;

#[derive(Debug, Serialize)]
pub struct PermissionsResponse {
    pub success: bool,
    pub subject: Option<String>,
    pub permissions: Vec<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// GET /api/v1/permissions
pub async fn show_permissions(AuthClaims(claims): AuthClaims) -> Json<PermissionsResponse> {
    let permissions = claims
        .permissions()
        .map(|p| p.map(str::to_string).collect())
        .unwrap_or_default();

    Json(PermissionsResponse {
        success: true,
        subject: claims.subject().map(str::to_string),
        permissions,
        expires_at: claims.expires_at(),
    })
}
