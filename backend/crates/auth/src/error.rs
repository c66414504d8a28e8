//! Auth Error Types
//!
//! Auth-specific failures. Every variant maps onto the unified
//! `kernel::error::AppError` for rendering, so clients always receive
//! `{"message": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use platform::cipher::CipherError;
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header
    #[error("Authorization is missing")]
    MissingAuthorization,

    /// Token failed signature, issuer, subject or expiry checks
    #[error("Invalid JWT token received")]
    InvalidToken(#[source] TokenError),

    /// Token was valid but its (id, email) pair no longer resolves to a user
    #[error("UserID was not found")]
    UserIdNotFound,

    /// Unknown user name or wrong password, deliberately indistinguishable
    #[error("Incorrect Username or Password found")]
    InvalidCredentials,

    #[error("Invalid Data found. Error: {0}")]
    Validation(String),

    /// Request body was not the expected JSON
    #[error("Failed to parse body")]
    MalformedBody,

    #[error("User name already exists")]
    UserNameTaken,

    #[error("Failed to encrypt data")]
    Encryption(#[source] CipherError),

    #[error("Failed to decrypt data")]
    Decryption(#[source] CipherError),

    #[error("Failed to create JWT token")]
    TokenIssue(#[source] TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthorization
            | AuthError::InvalidToken(_)
            | AuthError::UserIdNotFound
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Validation(_) | AuthError::MalformedBody => StatusCode::BAD_REQUEST,
            AuthError::UserNameTaken => StatusCode::CONFLICT,
            AuthError::Database(_) => StatusCode::from_u16(self.kind().status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AuthError::Encryption(_)
            | AuthError::Decryption(_)
            | AuthError::TokenIssue(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingAuthorization
            | AuthError::InvalidToken(_)
            | AuthError::UserIdNotFound
            | AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::Validation(_) | AuthError::MalformedBody => ErrorKind::BadRequest,
            AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::Database(e) => classify_sqlx(e).0,
            AuthError::Encryption(_)
            | AuthError::Decryption(_)
            | AuthError::TokenIssue(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Database failures carry the kernel's generic
    /// message instead of the driver text.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(e) => {
                let (kind, message) = classify_sqlx(e);
                AppError::new(kind, message)
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Encryption(e) | AuthError::Decryption(e) => {
                tracing::error!(error = %e, "Field cipher failure");
            }
            AuthError::TokenIssue(e) => {
                tracing::error!(error = %e, "Failed to sign token");
            }
            AuthError::InvalidToken(e) => {
                tracing::warn!(reason = ?e.reason(), "Rejected token");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::UserIdNotFound => {
                tracing::warn!("Token subject no longer resolves to a user");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.kind().is_client_error() {
            AuthError::Validation(err.message().to_string())
        } else {
            AuthError::Internal(err.to_string())
        }
    }
}
