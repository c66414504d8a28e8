//! List Users Use Case
//!
//! Paginated listing of every user. By default national ids are returned
//! exactly as stored (sealed); with `raw = false` they are decrypted and
//! records that fail to decrypt are left out of the page.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

pub const OFFSET_MIN: i64 = 0;
pub const LIMIT_MIN: i64 = 1;

/// Page request as parsed from the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListUsersInput {
    pub offset: i64,
    pub limit: i64,
    pub raw: bool,
}

impl ListUsersInput {
    /// Lenient parsing: an absent or unparsable number becomes 0 (so a
    /// missing `limit` yields an empty page), a parsed one is clamped up to
    /// its minimum. `raw` is true unless it is exactly `"false"`.
    pub fn from_query(offset: Option<&str>, limit: Option<&str>, raw: Option<&str>) -> Self {
        Self {
            offset: parse_param(offset, OFFSET_MIN),
            limit: parse_param(limit, LIMIT_MIN),
            raw: raw != Some("false"),
        }
    }
}

fn parse_param(value: Option<&str>, min: i64) -> i64 {
    match value.map(str::parse::<i64>) {
        Some(Ok(n)) => n.max(min),
        _ => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: String,
    pub user_name: String,
    pub email: String,
    /// Sealed envelope, or clear text when `raw` was false
    pub national_id: String,
}

#[derive(Debug)]
pub struct ListUsersOutput {
    pub users: Vec<UserRecord>,
    /// Number of users overall, not in this page
    pub total: i64,
}

pub struct ListUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: ListUsersInput) -> AuthResult<ListUsersOutput> {
        let total = self.user_repo.count().await?;
        let page = self.user_repo.list(input.limit, input.offset).await?;

        let users = page
            .into_iter()
            .filter_map(|user| {
                let national_id = if input.raw {
                    user.national_id.as_str().to_string()
                } else {
                    match user.national_id.open(&self.config.cipher) {
                        Ok(clear) => clear.as_str().to_string(),
                        Err(e) => {
                            tracing::warn!(user_id = %user.user_id, error = %e, "Skipping undecryptable record");
                            return None;
                        }
                    }
                };
                Some(UserRecord {
                    user_id: user.user_id.to_string(),
                    user_name: user.user_name.to_string(),
                    email: user.email.to_string(),
                    national_id,
                })
            })
            .collect();

        Ok(ListUsersOutput { users, total })
    }
}
