//! HTTP Handlers

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::{Extension, Json};
use std::sync::Arc;

use platform::bearer::extract_bearer;

use crate::application::config::AuthConfig;
use crate::application::{
    AuthUser, ListUsersInput, ListUsersUseCase, LoginInput, LoginUseCase, ProfileUseCase,
    RefreshUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    DataResponse, GetDataQuery, LoginRequest, LoginResponse, MessageResponse, OK_MESSAGE,
    ProfileResponse, RefreshResponse, RegisterRequest,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Unwrap a JSON body, answering `{"message": "Failed to parse body"}` on
/// anything axum could not deserialize.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| {
            tracing::debug!(error = %rejection, "Rejected request body");
            AuthError::MalformedBody
        })
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Json<LoginResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(LoginInput {
            user_name: req.user_name,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        message: OK_MESSAGE,
        access: output.access,
        refresh: output.refresh,
    }))
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(RegisterInput {
            user_name: req.user_name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            national_id: req.national_id,
        })
        .await?;

    Ok(Json(MessageResponse::ok()))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /refresh (refresh token in `Authorization: Bearer`)
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<RefreshResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = RefreshUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(extract_bearer(&headers)).await?;

    Ok(Json(RefreshResponse {
        message: OK_MESSAGE,
        access: output.access,
    }))
}

// ============================================================================
// Protected
// ============================================================================

/// GET /profile
pub async fn profile<R>(
    State(state): State<AuthAppState<R>>,
    Extension(auth_user): Extension<AuthUser>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(&auth_user).await?;

    Ok(Json(ProfileResponse {
        message: OK_MESSAGE,
        user_name: output.user_name,
        id: output.user_id,
        email: output.email,
        aadhar: output.national_id.as_str().to_string(),
    }))
}

/// GET /get-data?offset=&limit=&raw=
pub async fn get_data<R>(
    State(state): State<AuthAppState<R>>,
    Extension(_auth_user): Extension<AuthUser>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AuthResult<Json<DataResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let Query(pairs) = pairs.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected query string");
        AuthError::Validation(rejection.body_text())
    })?;
    let query = GetDataQuery::from_pairs(pairs);
    let input = ListUsersInput::from_query(
        query.offset.as_deref(),
        query.limit.as_deref(),
        query.raw.as_deref(),
    );
    let use_case = ListUsersUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(input).await?;

    Ok(Json(DataResponse {
        message: OK_MESSAGE,
        data: output.users.into_iter().map(Into::into).collect(),
        total: output.total,
    }))
}
