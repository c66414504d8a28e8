//! Profile Use Case
//!
//! The authenticated user's own record, national id decrypted.

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroizing;

use crate::application::authorize::AuthUser;
use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct ProfileOutput {
    pub user_id: String,
    pub user_name: String,
    pub email: String,
    pub national_id: Zeroizing<String>,
}

impl fmt::Debug for ProfileOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileOutput")
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .field("national_id", &"[REDACTED]")
            .finish()
    }
}

pub struct ProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, auth_user: &AuthUser) -> AuthResult<ProfileOutput> {
        // deleted between the gate and here
        let user = self
            .user_repo
            .find_by_id(&auth_user.user_id)
            .await?
            .ok_or(AuthError::UserIdNotFound)?;

        let national_id = user
            .national_id
            .open(&self.config.cipher)
            .map_err(AuthError::Decryption)?;

        Ok(ProfileOutput {
            user_id: user.user_id.to_string(),
            user_name: auth_user.user_name.to_string(),
            email: auth_user.email.to_string(),
            national_id,
        })
    }
}
