//! National ID Value Objects
//!
//! [`NationalId`] is the 12-digit identity number in clear text; it only
//! lives in memory for the length of a request and is wiped on drop.
//! [`SealedNationalId`] is the Field Cipher envelope that is stored and, on
//! the raw listing endpoint, returned as-is.

use std::fmt;

use platform::cipher::{CipherError, FieldCipher};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const NATIONAL_ID_LENGTH: usize = 12;

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct NationalId(String);

impl NationalId {
    /// Exactly 12 ASCII digits, nothing else (no spaces, no separators).
    pub fn new(input: &str) -> Option<Self> {
        let valid = input.len() == NATIONAL_ID_LENGTH && input.bytes().all(|b| b.is_ascii_digit());
        valid.then(|| Self(input.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn seal(&self, cipher: &FieldCipher) -> Result<SealedNationalId, CipherError> {
        cipher.encrypt(self.0.as_bytes()).map(SealedNationalId)
    }
}

impl fmt::Debug for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NationalId([REDACTED])")
    }
}

/// Encrypted national ID (URL-safe base64 envelope).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedNationalId(String);

impl SealedNationalId {
    pub fn from_db(envelope: impl Into<String>) -> Self {
        Self(envelope.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decrypt to the stored clear text. The result is not re-validated:
    /// whatever was sealed comes back.
    pub fn open(&self, cipher: &FieldCipher) -> Result<Zeroizing<String>, CipherError> {
        cipher.decrypt(&self.0).map(Zeroizing::new)
    }
}
