//! Register Use Case
//!
//! Creates a new user. The national id is sealed with the Field Cipher
//! before it reaches the repository.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    national_id::NationalId,
    user_id::UserId,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub national_id: String,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: UserId,
}

pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let national_id = NationalId::new(&input.national_id)
            .ok_or_else(|| AuthError::Validation("invalid national id number".to_string()))?;

        let email = Email::new(&input.email)?;

        if !RawPassword::for_login(&input.password)
            .matches(&RawPassword::for_login(&input.confirm_password))
        {
            return Err(AuthError::Validation(
                "password and confirm password must match".to_string(),
            ));
        }

        let user_name =
            UserName::new(&input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let raw_password = RawPassword::new(&input.password)?;

        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        let sealed = national_id
            .seal(&self.config.cipher)
            .map_err(AuthError::Encryption)?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let user = User::new(user_name, email, password_hash, sealed);
        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User registered"
        );

        Ok(RegisterOutput {
            user_id: user.user_id,
        })
    }
}
