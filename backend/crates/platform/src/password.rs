//! Password policy and Argon2id hashing
//!
//! A [`PlainPassword`] only exists after passing the policy (NFKC
//! normalisation, 8..=128 code points, no control characters, not a
//! well-known weak password). A [`HashedPassword`] is the PHC string stored
//! in the database. An optional application-wide pepper is appended to the
//! password before hashing and must be supplied again on verification.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

const WEAK_FRAGMENTS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "qazwsx", "1qaz2wsx"];

const WEAK_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "passw0rd",
    "abcdefgh",
    "letmein1",
    "welcome1",
    "admin123",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "trustno1",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("password cannot be empty or whitespace")]
    Blank,

    #[error("password contains control characters")]
    ControlCharacter,

    #[error("password is too easy to guess")]
    TooWeak,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("stored password hash is not a valid PHC string")]
    InvalidFormat,
}

/// Normalised clear text password. Zeroized on drop, never cloned.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PlainPassword(String);

impl PlainPassword {
    /// Normalise and check against the password policy.
    pub fn parse(raw: &str) -> Result<Self, PasswordPolicyError> {
        let normalized = Self::normalize(raw);
        check_policy(&normalized)?;
        Ok(Self(normalized.to_string()))
    }

    /// Normalise only. Used when checking a login attempt, where the
    /// policy in force at sign-up time is irrelevant.
    pub fn unchecked(raw: &str) -> Self {
        Self(Self::normalize(raw).to_string())
    }

    fn normalize(raw: &str) -> Zeroizing<String> {
        Zeroizing::new(raw.nfkc().collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact comparison, for password confirmation fields.
    pub fn matches(&self, other: &PlainPassword) -> bool {
        self.0 == other.0
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut material = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(pepper) = pepper {
            material.extend_from_slice(pepper);
        }
        material
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword([REDACTED])")
    }
}

fn check_policy(password: &str) -> Result<(), PasswordPolicyError> {
    if password.trim().is_empty() {
        return Err(PasswordPolicyError::Blank);
    }

    let actual = password.chars().count();
    if actual < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual,
        });
    }
    if actual > MAX_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooLong {
            max: MAX_PASSWORD_LENGTH,
            actual,
        });
    }

    if password
        .chars()
        .any(|c| c.is_control() && c != '\t' && c != '\n')
    {
        return Err(PasswordPolicyError::ControlCharacter);
    }

    if is_weak(password) {
        return Err(PasswordPolicyError::TooWeak);
    }
    Ok(())
}

fn is_weak(password: &str) -> bool {
    let lower = Zeroizing::new(password.to_lowercase());

    let mut chars = lower.chars();
    let first = chars.next();
    if chars.all(|c| Some(c) == first) {
        return true;
    }

    if is_digit_run(&lower) {
        return true;
    }

    WEAK_FRAGMENTS.iter().any(|f| lower.contains(f)) || WEAK_PASSWORDS.contains(&lower.as_str())
}

/// Only digits, each one step up (or down) from the last, wrapping 9/0.
fn is_digit_run(s: &str) -> bool {
    let digits: Option<Vec<u32>> = s.chars().map(|c| c.to_digit(10)).collect();
    let Some(digits) = digits else {
        return false;
    };
    if digits.len() < 4 {
        return false;
    }

    let up = digits.windows(2).all(|w| (w[0] + 1) % 10 == w[1]);
    let down = digits.windows(2).all(|w| (w[1] + 1) % 10 == w[0]);
    up || down
}

/// Argon2id hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Hash with a fresh random salt and the default Argon2id parameters.
    pub fn hash(password: &PlainPassword, pepper: Option<&[u8]>) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let material = password.peppered(pepper);
        let hash = Argon2::default()
            .hash_password(&material, &salt)
            .map_err(|e| PasswordHashError::Hashing(e.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a PHC string read from storage.
    pub fn from_phc(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::InvalidFormat)?;
        Ok(Self(phc))
    }

    pub fn as_phc(&self) -> &str {
        &self.0
    }

    pub fn verify(&self, password: &PlainPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            return false;
        };
        let material = password.peppered(pepper);
        Argon2::default().verify_password(&material, &parsed).is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([HASH])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_length() {
        assert_eq!(
            PlainPassword::parse("Sh0rt!").unwrap_err(),
            PasswordPolicyError::TooShort { min: 8, actual: 6 }
        );
        let long = "aB3$".repeat(33);
        assert!(matches!(
            PlainPassword::parse(&long),
            Err(PasswordPolicyError::TooLong { max: 128, actual: 132 })
        ));
    }

    #[test]
    fn test_policy_counts_code_points() {
        // 9 code points, 27 bytes
        assert!(PlainPassword::parse("パスワード安全です").is_ok());
    }

    #[test]
    fn test_policy_blank() {
        assert_eq!(PlainPassword::parse("").unwrap_err(), PasswordPolicyError::Blank);
        assert_eq!(
            PlainPassword::parse("          ").unwrap_err(),
            PasswordPolicyError::Blank
        );
    }

    #[test]
    fn test_policy_control_characters() {
        assert_eq!(
            PlainPassword::parse("Correct\u{0007}Horse9").unwrap_err(),
            PasswordPolicyError::ControlCharacter
        );
    }

    #[test]
    fn test_policy_weak_passwords() {
        for weak in ["password123", "PASSWORD", "aaaaaaaaaa", "12345678", "98765432", "myqwerty99"] {
            assert_eq!(
                PlainPassword::parse(weak).unwrap_err(),
                PasswordPolicyError::TooWeak,
                "{weak} should be rejected"
            );
        }
        assert!(PlainPassword::parse("13572468").is_ok());
    }

    #[test]
    fn test_nfkc_normalisation() {
        // full-width letters normalise to ASCII
        let wide = PlainPassword::unchecked("ＰａｓｓＷｏｒｄ９");
        assert_eq!(wide.as_str(), "PassWord9");
        assert!(wide.matches(&PlainPassword::unchecked("PassWord9")));
    }

    #[test]
    fn test_hash_and_verify() {
        let password = PlainPassword::parse("Tr0ub4dor&3x").unwrap();
        let hashed = HashedPassword::hash(&password, None).unwrap();

        assert!(hashed.as_phc().starts_with("$argon2id$"));
        assert!(hashed.verify(&password, None));
        assert!(!hashed.verify(&PlainPassword::unchecked("Tr0ub4dor&3y"), None));
    }

    #[test]
    fn test_salt_is_random() {
        let password = PlainPassword::parse("Tr0ub4dor&3x").unwrap();
        let a = HashedPassword::hash(&password, None).unwrap();
        let b = HashedPassword::hash(&password, None).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_pepper_must_match() {
        let password = PlainPassword::parse("Tr0ub4dor&3x").unwrap();
        let hashed = HashedPassword::hash(&password, Some(b"pepper")).unwrap();

        assert!(hashed.verify(&password, Some(b"pepper")));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some(b"salt")));
    }

    #[test]
    fn test_from_phc() {
        let password = PlainPassword::parse("Tr0ub4dor&3x").unwrap();
        let stored = HashedPassword::hash(&password, None).unwrap().as_phc().to_string();

        let restored = HashedPassword::from_phc(stored).unwrap();
        assert!(restored.verify(&password, None));
        assert!(matches!(
            HashedPassword::from_phc("plaintext"),
            Err(PasswordHashError::InvalidFormat)
        ));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = PlainPassword::unchecked("hunter22hunter");
        let hashed = HashedPassword::hash(&password, None).unwrap();
        assert!(!format!("{password:?}").contains("hunter"));
        assert!(!format!("{hashed:?}").contains("argon2"));
    }
}
