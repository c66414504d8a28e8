//! Error conversions
//!
//! `From` impls into [`AppError`] for the third-party errors that cross crate
//! boundaries, plus the axum response rendering.

use super::app_error::AppError;
#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_request("Failed to parse body").with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

/// Classify a database error without consuming it.
#[cfg(feature = "sqlx")]
pub fn classify_sqlx(err: &sqlx::Error) -> (ErrorKind, &'static str) {
    match err {
        sqlx::Error::RowNotFound => (ErrorKind::NotFound, "Record not found"),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => (
            ErrorKind::ServiceUnavailable,
            "Failed to establish connection to database",
        ),
        // 23505: unique_violation, 23502: not_null_violation
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => (ErrorKind::Conflict, "Duplicate key value"),
            Some("23502") => (ErrorKind::BadRequest, "Required field is null"),
            _ => (
                ErrorKind::InternalServerError,
                "Failed to insert record into database",
            ),
        },
        _ => (
            ErrorKind::InternalServerError,
            "Failed to fetch data from database",
        ),
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let (kind, message) = classify_sqlx(&err);
        AppError::new(kind, message).with_source(err)
    }
}

/// Renders as `{"message": ...}`, the body shape the frontend reads.
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::json!({
            "message": self.message(),
            "status": self.status_code(),
            "error": self.kind(),
        });

        (status, Json(body)).into_response()
    }
}
