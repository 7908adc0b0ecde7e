/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - route ごとに必要な permission をここで宣言する
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    images::{create_image, list_images},
    permissions::show_permissions,
};
use crate::middleware::auth::permission;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/images",
            permission::require(get(list_images), state, "get:images")
                .merge(permission::require(post(create_image), state, "post:images")),
        )
        .route(
            "/permissions",
            permission::require(get(show_permissions), state, "get:permissions"),
        )
}
