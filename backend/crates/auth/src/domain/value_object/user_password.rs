//! User Password Value Objects
//!
//! Domain wrappers over `platform::password`: [`RawPassword`] is what the
//! user typed, [`UserPassword`] is the stored Argon2id hash.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{HashedPassword, PasswordPolicyError, PlainPassword};
use std::fmt;

/// Password as submitted. Zeroized on drop.
pub struct RawPassword(PlainPassword);

impl RawPassword {
    /// Apply the password policy (registration).
    pub fn new(raw: &str) -> AppResult<Self> {
        PlainPassword::parse(raw)
            .map(Self)
            .map_err(|e| AppError::bad_request(policy_message(&e)))
    }

    /// Skip the policy (login). Accounts created under an older policy must
    /// still be able to sign in.
    pub fn for_login(raw: &str) -> Self {
        Self(PlainPassword::unchecked(raw))
    }

    pub fn matches(&self, other: &RawPassword) -> bool {
        self.0.matches(&other.0)
    }
}

fn policy_message(err: &PasswordPolicyError) -> String {
    match err {
        PasswordPolicyError::TooShort { min, .. } => {
            format!("password must be at least {min} characters")
        }
        PasswordPolicyError::TooLong { max, .. } => {
            format!("password must be at most {max} characters")
        }
        other => other.to_string(),
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Stored password hash (PHC string).
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        HashedPassword::hash(&raw.0, pepper)
            .map(Self)
            .map_err(|e| AppError::internal("Failed to hash password").with_source(e))
    }

    pub fn from_db(phc: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc(phc)
            .map(Self)
            .map_err(|e| AppError::internal("Invalid password hash in database").with_source(e))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(&raw.0, pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_policy_on_registration() {
        assert!(RawPassword::new("V4lid-Passw0rd").is_ok());

        let err = RawPassword::new("short").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), "password must be at least 8 characters");

        assert!(RawPassword::new("password123").is_err());
    }

    #[test]
    fn test_login_skips_policy() {
        let raw = RawPassword::for_login("short");
        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(hashed.verify(&RawPassword::for_login("short"), None));
    }

    #[test]
    fn test_matches() {
        let a = RawPassword::new("V4lid-Passw0rd").unwrap();
        assert!(a.matches(&RawPassword::for_login("V4lid-Passw0rd")));
        assert!(!a.matches(&RawPassword::for_login("V4lid-Passw0rD")));
    }

    #[test]
    fn test_hash_verify_and_reload() {
        let raw = RawPassword::new("V4lid-Passw0rd").unwrap();
        let pepper = Some(b"pepper".as_slice());
        let hashed = UserPassword::from_raw(&raw, pepper).unwrap();

        let reloaded = UserPassword::from_db(hashed.as_phc_string()).unwrap();
        assert!(reloaded.verify(&raw, pepper));
        assert!(!reloaded.verify(&raw, None));
        assert!(UserPassword::from_db("not-a-hash").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("V4lid-Passw0rd").unwrap();
        assert!(!format!("{raw:?}").contains("V4lid"));
        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(format!("{hashed:?}").contains("[HASH]"));
    }
}
