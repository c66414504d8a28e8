//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router, Authorization Gate
//!
//! ## Features
//! - Registration with a field-encrypted national id
//! - Login issuing a short-lived access token and a longer-lived refresh token
//! - Access token refresh
//! - Protected profile and paginated user listing
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - National ids sealed with AES-CBC before storage (no MAC, see
//!   `platform::cipher`)
//! - Stateless HS256 tokens; every protected request re-resolves the
//!   token's (id, email) pair against the repository

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use application::AuthUser;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, PgUserRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
