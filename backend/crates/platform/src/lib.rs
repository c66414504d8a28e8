//! Platform Crate - Technical Infrastructure
//!
//! Primitives shared by the domain crates. Nothing in here knows about
//! users, routes or databases:
//! - Field-level encryption of sensitive values (AES-CBC, URL-safe envelope)
//! - Signed access/refresh tokens (HS256 JWT)
//! - Secret loading from the process environment
//! - Bearer token extraction from request headers
//! - Password hashing (Argon2id)

pub mod bearer;
pub mod cipher;
pub mod crypto;
pub mod password;
pub mod secret;
pub mod token;

pub use cipher::{CipherError, FieldCipher};
pub use secret::{Secret, SecretError};
pub use token::{Claims, TokenError, TokenPurpose, TokenService};
