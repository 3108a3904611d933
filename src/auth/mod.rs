//! Authentication: credential storage and the actix guard middleware.

pub mod credential_store;
pub mod middleware;

pub use credential_store::{ApiKeyRecord, CredentialStore};
pub use middleware::AuthMiddleware;

/// Identity of the caller attached to request extensions by `AuthMiddleware`
/// once a key has been validated.
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyIdentity {
    pub id: i64,
}
