//! Authorize Use Case
//!
//! Core of the Authorization Gate: turn a bearer token into an
//! authenticated user, or a precise rejection.

use std::sync::Arc;

use platform::token::{Claims, TokenPurpose};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_id::{UserId, parse_user_id},
    user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

/// Identity attached to a request that passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: Email,
    pub user_name: UserName,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            user_name: user.user_name,
        }
    }
}

pub struct AuthorizeUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> AuthorizeUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// `bearer` is the token from `Authorization: Bearer <token>`, `None` if
    /// the header was absent or malformed.
    pub async fn execute(&self, bearer: Option<&str>) -> AuthResult<AuthUser> {
        let token = bearer.ok_or(AuthError::MissingAuthorization)?;
        let claims = self
            .config
            .tokens
            .verify(token, TokenPurpose::Access)
            .map_err(AuthError::InvalidToken)?;

        resolve_identity(self.user_repo.as_ref(), &claims)
            .await
            .map(AuthUser::from)
    }
}

/// Re-resolve the (id, email) pair from verified claims. A signed token
/// whose user has since disappeared or changed email is not enough.
pub(crate) async fn resolve_identity<U>(user_repo: &U, claims: &Claims) -> AuthResult<User>
where
    U: UserRepository,
{
    let Some(user_id) = parse_user_id(&claims.user_id) else {
        return Err(AuthError::UserIdNotFound);
    };
    let email = Email::from_claim(&claims.email);

    user_repo
        .find_by_id_and_email(&user_id, &email)
        .await?
        .ok_or(AuthError::UserIdNotFound)
}
