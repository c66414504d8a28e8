//! Shared Kernel
//!
//! Vocabulary that every backend crate agrees on:
//! - The unified [`error::app_error::AppError`] and its [`error::kind::ErrorKind`]
//! - Typed identifiers ([`id::Id`])
//!
//! Anything placed here should be stable across domains; domain-specific
//! errors live in their own crates and convert into `AppError` at the edge.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;

pub use error::app_error::{AppError, AppResult};
pub use error::kind::ErrorKind;
