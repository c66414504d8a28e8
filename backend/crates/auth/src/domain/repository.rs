//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer.

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new user. A taken user name is `AuthError::UserNameTaken`.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Exact, case-sensitive match
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Resolve the identity carried by a token. Both fields must match.
    async fn find_by_id_and_email(
        &self,
        user_id: &UserId,
        email: &Email,
    ) -> AuthResult<Option<User>>;

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// Total number of users
    async fn count(&self) -> AuthResult<i64>;

    /// One page of users in insertion order
    async fn list(&self, limit: i64, offset: i64) -> AuthResult<Vec<User>>;
}
