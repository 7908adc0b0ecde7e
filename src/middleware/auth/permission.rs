//! Per-route permission guard: bearer token 検証 → permission check → Claims を extensions に入れる
//!
//! - 検証ロジックは `services::auth::Authorizer` に閉じている (axum 非依存)
//! - ここでは AuthError を RejectionPolicy に従って AppError に変換するだけ

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::Authorizer;
use crate::state::AppState;

/// State handed to the middleware: which authorizer, which permission.
#[derive(Clone, Debug)]
pub struct PermissionGuard {
    authorizer: Arc<Authorizer>,
    permission: Arc<str>,
}

impl PermissionGuard {
    pub fn new(authorizer: Arc<Authorizer>, permission: &str) -> Self {
        Self {
            authorizer,
            permission: Arc::from(permission),
        }
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }
}

/// Guard a method router so its handlers only run for callers holding `permission`.
///
/// 例：
/// ```ignore
/// Router::new().route(
///     "/images",
///     permission::require(get(list_images), &state, "get:images"),
/// )
/// ```
pub fn require(
    method_router: MethodRouter<AppState>,
    state: &AppState,
    permission: &str,
) -> MethodRouter<AppState> {
    let guard = PermissionGuard::new(Arc::clone(&state.authorizer), permission);
    // route_layer: unmatched methods still get 405 instead of an auth error
    method_router.route_layer(middleware::from_fn_with_state(guard, permission_middleware))
}

async fn permission_middleware(
    State(guard): State<PermissionGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = guard
        .authorizer
        .authorize(req.headers(), guard.permission())
        .await
        .map_err(|err| AppError::from_auth(err, guard.authorizer.rejection_policy()))?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
