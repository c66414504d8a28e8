//! Auth Middleware
//!
//! The Authorization Gate for protected routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use platform::bearer::extract_bearer;

use crate::application::AuthorizeUseCase;
use crate::domain::repository::UserRepository;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Require a valid access token whose identity still resolves.
///
/// On success the [`crate::application::AuthUser`] is inserted into the
/// request extensions for downstream handlers. Otherwise the request is
/// answered with 401 and one of "Authorization is missing", "Invalid JWT
/// token received" or "UserID was not found".
pub async fn require_access_token<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let bearer = extract_bearer(req.headers()).map(str::to_owned);

    let use_case = AuthorizeUseCase::new(state.repo.clone(), state.config.clone());
    let auth_user = use_case.execute(bearer.as_deref()).await?;

    tracing::debug!(user_id = %auth_user.user_id, "Request authorized");
    req.extensions_mut().insert(auth_user);

    Ok(next.run(req).await)
}
