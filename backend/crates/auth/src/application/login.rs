//! Login Use Case
//!
//! Checks credentials and issues an access/refresh token pair.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub access: String,
    pub refresh: String,
}

pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // a name that could never have registered cannot match either
        let user_name =
            UserName::new(&input.user_name).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let raw_password = RawPassword::for_login(&input.password);
        if !user
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            return Err(AuthError::InvalidCredentials);
        }

        let user_id = user.user_id.to_string();
        let tokens = &self.config.tokens;
        let access = tokens
            .issue_access(&user_id, user.email.as_str())
            .map_err(AuthError::TokenIssue)?;
        let refresh = tokens
            .issue_refresh(&user_id, user.email.as_str())
            .map_err(AuthError::TokenIssue)?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LoginOutput { access, refresh })
    }
}
