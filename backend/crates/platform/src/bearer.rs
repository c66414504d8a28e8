//! Bearer Token Extraction

use axum::http::{HeaderMap, header};

pub const BEARER_PREFIX: &str = "Bearer ";

/// Token from an `Authorization: Bearer <token>` header.
///
/// Returns `None` when the header is absent, not ASCII, or uses another
/// scheme. The prefix match is case-sensitive. An empty token after the
/// prefix is returned as-is and left for verification to reject.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}
