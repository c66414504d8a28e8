//! Token Service
//!
//! Issues and verifies HS256-signed JWTs. Access and refresh tokens share
//! one secret and differ only by their `sub` claim, so verification always
//! pins the expected subject: a refresh token is never accepted where an
//! access token is required, and vice versa.
//!
//! Tokens are stateless. They stop being valid only by expiry.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::secret::{Secret, SecretError};

/// `iss` claim of every token this service issues
pub const ISSUER: &str = "backend-api";

pub const ACCESS_SUBJECT: &str = "ACCESS";
pub const REFRESH_SUBJECT: &str = "REFRESH";

/// Environment variable holding the signing secret
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

const ALGORITHM: Algorithm = Algorithm::HS256;

/// What a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    /// Short-lived, presented on every protected request
    Access,
    /// Longer-lived, exchanged for a new access token
    Refresh,
}

impl TokenPurpose {
    pub const fn subject(self) -> &'static str {
        match self {
            TokenPurpose::Access => ACCESS_SUBJECT,
            TokenPurpose::Refresh => REFRESH_SUBJECT,
        }
    }

    /// Fixed lifetime: 5 minutes for access, 30 for refresh.
    pub fn ttl(self) -> Duration {
        match self {
            TokenPurpose::Access => Duration::minutes(5),
            TokenPurpose::Refresh => Duration::minutes(30),
        }
    }
}

/// Token payload. Timestamps are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "id")]
    pub user_id: String,
    pub email: String,
    pub iss: String,
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, wrong algorithm, wrong issuer or subject, expired or
    /// malformed. Callers only learn that the token is unusable; the cause
    /// is kept as the error source for logs.
    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Secret(#[from] SecretError),
}

impl TokenError {
    /// Underlying rejection reason, for logging.
    pub fn reason(&self) -> Option<&JwtErrorKind> {
        match self {
            TokenError::Invalid(e) => Some(e.kind()),
            _ => None,
        }
    }
}

pub type TokenResult<T> = Result<T, TokenError>;

/// Signs and verifies tokens with the shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Secret from `JWT_SECRET`.
    pub fn from_env() -> TokenResult<Self> {
        Self::from_env_var(JWT_SECRET_ENV)
    }

    pub fn from_env_var(name: &'static str) -> TokenResult<Self> {
        let secret = Secret::from_env(name)?;
        Ok(Self::new(secret.expose()))
    }

    /// Issue a token with the policy lifetime of `purpose`.
    pub fn issue(&self, user_id: &str, email: &str, purpose: TokenPurpose) -> TokenResult<String> {
        self.issue_with_expiry(user_id, email, purpose, purpose.ttl())
    }

    pub fn issue_access(&self, user_id: &str, email: &str) -> TokenResult<String> {
        self.issue(user_id, email, TokenPurpose::Access)
    }

    pub fn issue_refresh(&self, user_id: &str, email: &str) -> TokenResult<String> {
        self.issue(user_id, email, TokenPurpose::Refresh)
    }

    /// Issue with an explicit lifetime. A zero lifetime yields a token that
    /// is already expired.
    pub fn issue_with_expiry(
        &self,
        user_id: &str,
        email: &str,
        purpose: TokenPurpose,
        expiry: Duration,
    ) -> TokenResult<String> {
        let claims = Self::claims_at(user_id, email, purpose.subject(), expiry, Utc::now());
        self.sign(&claims)
    }

    fn claims_at(
        user_id: &str,
        email: &str,
        subject: &str,
        expiry: Duration,
        now: DateTime<Utc>,
    ) -> Claims {
        Claims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            iss: ISSUER.to_string(),
            sub: subject.to_string(),
            exp: (now + expiry).timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
        }
    }

    fn sign(&self, claims: &Claims) -> TokenResult<String> {
        jsonwebtoken::encode(&Header::new(ALGORITHM), claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Verify a token issued for `purpose` by this service.
    pub fn verify(&self, token: &str, purpose: TokenPurpose) -> TokenResult<Claims> {
        self.verify_with(token, ISSUER, purpose.subject())
    }

    pub fn verify_access(&self, token: &str) -> TokenResult<Claims> {
        self.verify(token, TokenPurpose::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> TokenResult<Claims> {
        self.verify(token, TokenPurpose::Refresh)
    }

    /// Verify signature (HS256 only), issuer, subject, `nbf` and `exp`.
    ///
    /// `exp` is required and the token is valid only while `now < exp`.
    pub fn verify_with(
        &self,
        token: &str,
        expected_issuer: &str,
        expected_subject: &str,
    ) -> TokenResult<Claims> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_issuer(&[expected_issuer]);
        validation.sub = Some(expected_subject.to_string());
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map_err(TokenError::Invalid)?;

        // jsonwebtoken still accepts exp == now
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Invalid(JwtErrorKind::ExpiredSignature.into()));
        }

        Ok(data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &ALGORITHM)
            .field("issuer", &ISSUER)
            .finish_non_exhaustive()
    }
}
