/*!
 * Authenticated claims extractor
 *
 * Responsibility:
 * - 認可済みリクエストの Claims を handler に提供する
 * - Claims は middleware::auth::permission が request extensions に格納する
 *
 * Public API:
 * - AuthClaims
 */

mod core;

pub use self::core::AuthClaims;
