pub mod authorizer;
pub mod bearer;
pub mod claims;
pub mod error;
pub mod factory;
pub mod jwks;

pub use authorizer::{Authorizer, AuthorizerConfig, Guarded, RejectionPolicy};
pub use claims::Claims;
pub use error::{AuthError, AuthErrorCode, AuthStage};
pub use factory::build_authorizer;
pub use jwks::{HttpKeySetSource, JsonWebKey, KeySet, KeySetError, KeySetSource};
