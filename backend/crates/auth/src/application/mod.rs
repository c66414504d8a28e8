//! Application Layer
//!
//! Use cases and application services.

pub mod authorize;
pub mod config;
pub mod list_users;
pub mod login;
pub mod profile;
pub mod refresh;
pub mod register;

// Re-exports
pub use authorize::{AuthUser, AuthorizeUseCase};
pub use config::{AuthConfig, ConfigError};
pub use list_users::{ListUsersInput, ListUsersOutput, ListUsersUseCase, UserRecord};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use profile::{ProfileOutput, ProfileUseCase};
pub use refresh::{RefreshOutput, RefreshUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
