//! Application Configuration
//!
//! Secrets and the services built from them. Constructed once at startup
//! and shared behind an `Arc`.

use platform::cipher::{CipherError, FieldCipher};
use platform::secret::Secret;
use platform::token::{TokenError, TokenService};
use thiserror::Error;

/// Optional application-wide pepper appended to passwords before hashing
pub const PASSWORD_PEPPER_ENV: &str = "PASSWORD_PEPPER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("field cipher: {0}")]
    Cipher(#[from] CipherError),

    #[error("token service: {0}")]
    Token(#[from] TokenError),
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Encrypts national ids at rest
    pub cipher: FieldCipher,
    /// Issues and verifies access/refresh tokens
    pub tokens: TokenService,
    pub password_pepper: Option<Secret>,
}

impl AuthConfig {
    pub fn new(cipher: FieldCipher, tokens: TokenService) -> Self {
        Self {
            cipher,
            tokens,
            password_pepper: None,
        }
    }

    pub fn with_pepper(mut self, pepper: impl Into<Vec<u8>>) -> Self {
        self.password_pepper = Some(Secret::new(pepper));
        self
    }

    /// Read `AES_KEY`, `JWT_SECRET` and optionally `PASSWORD_PEPPER`.
    ///
    /// Fails if a required secret is absent or the AES key has the wrong
    /// length, so a misconfigured process never starts serving.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cipher = FieldCipher::from_env()?;
        cipher.check_key()?;
        let tokens = TokenService::from_env()?;
        let password_pepper = Secret::from_env(PASSWORD_PEPPER_ENV)
            .ok()
            .filter(|pepper| !pepper.is_empty());

        Ok(Self {
            cipher,
            tokens,
            password_pepper,
        })
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_ref().map(Secret::expose)
    }
}
