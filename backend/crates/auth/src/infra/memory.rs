//! In-Memory Repository Implementation
//!
//! Keeps users in insertion order behind an async lock. Used by tests and
//! handy for running the HTTP surface without a database.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a stored user wholesale (matched by id).
    pub async fn replace(&self, user: User) {
        let mut users = self.users.write().await;
        if let Some(slot) = users.iter_mut().find(|u| u.user_id == user.user_id) {
            *slot = user;
        }
    }

    pub async fn remove(&self, user_id: &UserId) {
        self.users.write().await.retain(|u| u.user_id != *user_id);
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.user_name == user.user_name) {
            return Err(AuthError::UserNameTaken);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user_id == *user_id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user_name == *user_name).cloned())
    }

    async fn find_by_id_and_email(
        &self,
        user_id: &UserId,
        email: &Email,
    ) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.is_identified_by(user_id, email))
            .cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.user_name == *user_name))
    }

    async fn count(&self) -> AuthResult<i64> {
        Ok(self.users.read().await.len() as i64)
    }

    async fn list(&self, limit: i64, offset: i64) -> AuthResult<Vec<User>> {
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        let users = self.users.read().await;
        Ok(users.iter().skip(offset).take(limit).cloned().collect())
    }
}
