//! Secret Material
//!
//! Keys and signing secrets are read from the environment once, at process
//! start, and handed to the services that need them.

use std::ffi::OsString;
use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    /// The environment variable is not set
    #[error("key not found: {name}")]
    KeyNotFound { name: &'static str },
}

/// Raw secret bytes, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Read a secret from the environment.
    ///
    /// The value's raw bytes are used, whether or not they are UTF-8. A
    /// variable that is set but empty is returned as an empty secret; the
    /// consumer decides whether that is usable.
    pub fn from_env(name: &'static str) -> Result<Self, SecretError> {
        std::env::var_os(name)
            .map(|value| Self(os_bytes(value)))
            .ok_or(SecretError::KeyNotFound { name })
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(unix)]
fn os_bytes(value: OsString) -> Vec<u8> {
    use std::os::unix::ffi::OsStringExt;
    value.into_vec()
}

// Non-unix platforms have no lossless byte view of an OsString.
#[cfg(not(unix))]
fn os_bytes(value: OsString) -> Vec<u8> {
    value.to_string_lossy().into_owned().into_bytes()
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Secret").field(&"[REDACTED]").finish()
    }
}
