/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth::permission::require(...), http::apply(...)
 */
pub mod auth;
pub mod http;
