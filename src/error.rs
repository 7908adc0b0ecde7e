/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - AuthError を RejectionPolicy に従って外側の境界でだけ変換する
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::{AuthError, AuthErrorCode, AuthStage, RejectionPolicy};

/// `{ "success": false, "error": <status>, "message": <description> }`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("service unavailable")]
    Unavailable,
    #[error("resource not found")]
    NotFound,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    /// Render an authorization failure according to `policy`.
    ///
    /// `Collapsed` drops the code and description; the caller is expected to
    /// have logged them already (`Authorizer::authorize` does).
    pub fn from_auth(err: AuthError, policy: RejectionPolicy) -> Self {
        match policy {
            RejectionPolicy::Detailed => AppError::Auth(err),
            RejectionPolicy::Collapsed => match (err.code(), err.stage()) {
                (AuthErrorCode::KeySetUnreachable, _) => AppError::Unavailable,
                (_, AuthStage::Authentication) => AppError::Unauthorized,
                (_, AuthStage::Authorization) => AppError::Forbidden,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            AppError::Auth(err) => (
                err.status(),
                err.description().to_string(),
                Some(err.code().as_str()),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".into(), None),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden".into(), None),
            AppError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service unavailable".into(),
                None,
            ),
            AppError::NotFound => (StatusCode::NOT_FOUND, "resource not found".into(), None),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".into(),
                None,
            ),
        };

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message,
            code,
        };

        (status, Json(body)).into_response()
    }
}
