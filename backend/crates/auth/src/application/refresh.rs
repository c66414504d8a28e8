//! Refresh Use Case
//!
//! Exchanges a refresh token for a new access token. The refresh token
//! itself is not rotated and stays valid until it expires.

use std::sync::Arc;

use platform::token::TokenPurpose;

use crate::application::authorize::resolve_identity;
use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

#[derive(Debug)]
pub struct RefreshOutput {
    pub access: String,
}

pub struct RefreshUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RefreshUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, bearer: Option<&str>) -> AuthResult<RefreshOutput> {
        let token = bearer.ok_or(AuthError::MissingAuthorization)?;
        let tokens = &self.config.tokens;
        let claims = tokens
            .verify(token, TokenPurpose::Refresh)
            .map_err(AuthError::InvalidToken)?;

        let user = resolve_identity(self.user_repo.as_ref(), &claims).await?;

        let access = tokens
            .issue_access(&claims.user_id, user.email.as_str())
            .map_err(AuthError::TokenIssue)?;

        tracing::info!(user_id = %user.user_id, "Access token refreshed");

        Ok(RefreshOutput { access })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryUserRepository;
    use crate::test_support::{config, seed_user};

    #[tokio::test]
    async fn test_refresh_issues_access_token() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let config = config();
        let user_id = seed_user(&repo, &config, "alice", "alice@example.com").await;
        let use_case = RefreshUseCase::new(repo.clone(), config.clone());

        let refresh = config
            .tokens
            .issue_refresh(&user_id.to_string(), "alice@example.com")
            .unwrap();
        let output = use_case.execute(Some(refresh.as_str())).await.unwrap();

        let claims = config.tokens.verify_access(&output.access).unwrap();
        assert_eq!(claims.user_id, user_id.to_string());
        assert_eq!(claims.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_refresh_rejections() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let config = config();
        let user_id = seed_user(&repo, &config, "alice", "alice@example.com").await;
        let use_case = RefreshUseCase::new(repo.clone(), config.clone());
        let id = user_id.to_string();

        let err = use_case.execute(None).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingAuthorization));

        let access = config.tokens.issue_access(&id, "alice@example.com").unwrap();
        let err = use_case.execute(Some(access.as_str())).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));

        let refresh = config.tokens.issue_refresh(&id, "alice@example.com").unwrap();
        repo.remove(&user_id).await;
        let err = use_case.execute(Some(refresh.as_str())).await.unwrap_err();
        assert!(matches!(err, AuthError::UserIdNotFound));
    }
}
