//! API DTOs (Data Transfer Objects)
//!
//! Wire format is snake_case JSON. Successful responses carry
//! `"message": "ok"`; the national id travels under the `aadhar` key the
//! frontend already reads.

use serde::{Deserialize, Serialize};

use crate::application::list_users::UserRecord;

pub const OK_MESSAGE: &str = "ok";

// ============================================================================
// Login
// ============================================================================

/// Absent fields are treated as empty strings and fail validation later.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub access: String,
    pub refresh: String,
}

// ============================================================================
// Register
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(rename = "aadhar")]
    pub national_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self {
            message: OK_MESSAGE,
        }
    }
}

// ============================================================================
// Refresh
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub message: &'static str,
    pub access: String,
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub user_name: String,
    pub id: String,
    pub email: String,
    pub aadhar: String,
}

// ============================================================================
// Get Data
// ============================================================================

/// Kept as raw strings: the use case owns the lenient number parsing.
/// A repeated key keeps its first value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetDataQuery {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub raw: Option<String>,
}

impl GetDataQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "offset" => &mut query.offset,
                "limit" => &mut query.limit,
                "raw" => &mut query.raw,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserItem {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub aadhar: String,
}

impl From<UserRecord> for UserItem {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.user_id,
            user_name: record.user_name,
            email: record.email,
            aadhar: record.national_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DataResponse {
    pub message: &'static str,
    pub data: Vec<UserItem>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_keeps_first_value() {
        let query = GetDataQuery::from_pairs(pairs(&[
            ("limit", "1"),
            ("limit", "2"),
            ("raw", "false"),
            ("raw", "true"),
            ("other", "x"),
        ]));
        assert_eq!(query.limit.as_deref(), Some("1"));
        assert_eq!(query.raw.as_deref(), Some("false"));
        assert_eq!(query.offset, None);
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(GetDataQuery::from_pairs(Vec::new()), GetDataQuery::default());
    }

    #[test]
    fn test_register_request_reads_aadhar() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"user_name":"alice","aadhar":"123412341234"}"#).unwrap();
        assert_eq!(req.user_name, "alice");
        assert_eq!(req.national_id, "123412341234");
        assert!(req.password.is_empty());
    }
}
