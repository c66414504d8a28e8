//! Fixtures shared by the use case and HTTP tests.

use std::sync::Arc;

use platform::cipher::FieldCipher;
use platform::token::TokenService;

use crate::application::config::AuthConfig;
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::domain::value_object::user_id::UserId;
use crate::infra::memory::InMemoryUserRepository;

pub const AES_KEY: &[u8] = b"0123456789abcdef0123456789abcdef";
pub const JWT_SECRET: &[u8] = b"this-is-secret";
pub const PASSWORD: &str = "C0rrect-Horse-Battery";
pub const NATIONAL_ID: &str = "123412341234";

pub fn config() -> Arc<AuthConfig> {
    Arc::new(AuthConfig::new(
        FieldCipher::new(AES_KEY.to_vec()),
        TokenService::new(JWT_SECRET),
    ))
}

pub fn register_input(user_name: &str, email: &str) -> RegisterInput {
    RegisterInput {
        user_name: user_name.to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        confirm_password: PASSWORD.to_string(),
        national_id: NATIONAL_ID.to_string(),
    }
}

/// Register a user through the real use case.
pub async fn seed_user(
    repo: &Arc<InMemoryUserRepository>,
    config: &Arc<AuthConfig>,
    user_name: &str,
    email: &str,
) -> UserId {
    RegisterUseCase::new(repo.clone(), config.clone())
        .execute(register_input(user_name, email))
        .await
        .unwrap()
        .user_id
}
