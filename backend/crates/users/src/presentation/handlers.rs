//! HTTP Handlers

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;

use crate::application::config::UsersConfig;
use crate::application::context::RequestContext;
use crate::application::{
    GetProfileUseCase, ListUsersUseCase, RegisterInput, RegisterUseCase, SignInInput,
    SignInUseCase, UpdateProfileUseCase,
};
use crate::domain::entity::{ProfileView, UserView};
use crate::domain::repository::{CredentialRepository, ProfileRepository, UserQueryRepository};
use crate::domain::value_object::Page;
use crate::error::UserResult;
use crate::presentation::dto::{
    ListUsersQuery, RegisterRequest, RegisterResponse, SignInRequest, SignInResponse,
    UpdateProfileRequest, UpdateStatusRequest,
};

/// Everything the HTTP layer needs from a store
pub trait UsersStore:
    CredentialRepository + UserQueryRepository + ProfileRepository + Clone + Send + Sync + 'static
{
}

impl<T> UsersStore for T where
    T: CredentialRepository
        + UserQueryRepository
        + ProfileRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}

/// Shared state for users handlers
#[derive(Clone)]
pub struct UsersAppState<R>
where
    R: UsersStore,
{
    pub repo: Arc<R>,
    pub config: Arc<UsersConfig>,
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<R>(
    State(state): State<UsersAppState<R>>,
    Json(req): Json<SignInRequest>,
) -> UserResult<Json<SignInResponse>>
where
    R: UsersStore,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            user_name: req.username,
            password: req.password,
        })
        .await?;

    Ok(Json(SignInResponse {
        access_token: output.access_token,
        token_type: "Bearer",
        expires_at_ms: output.expires_at_ms,
        role: output.role,
    }))
}

/// POST /api/auth/register (admin)
pub async fn register<R>(
    State(state): State<UsersAppState<R>>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<RegisterRequest>,
) -> UserResult<(StatusCode, Json<RegisterResponse>)>
where
    R: UsersStore,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(
            Some(&ctx),
            RegisterInput {
                user_name: req.username,
                password: req.password,
                role: req.role,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: output.user_id.to_string(),
        }),
    ))
}

// ============================================================================
// Users / Profiles
// ============================================================================

/// GET /api/users (admin)
pub async fn list_users<R>(
    State(state): State<UsersAppState<R>>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<ListUsersQuery>,
) -> UserResult<Json<Page<UserView>>>
where
    R: UsersStore,
{
    let (filter, page) = query.into_parts();
    let use_case = ListUsersUseCase::new(state.repo.clone());

    Ok(Json(use_case.execute(&ctx, filter, page).await?))
}

/// GET /api/profiles
pub async fn get_profile<R>(
    State(state): State<UsersAppState<R>>,
    Extension(ctx): Extension<RequestContext>,
) -> UserResult<Json<ProfileView>>
where
    R: UsersStore,
{
    let use_case = GetProfileUseCase::new(state.repo.clone());

    Ok(Json(use_case.execute(&ctx).await?))
}

/// PUT /api/profiles
pub async fn update_profile<R>(
    State(state): State<UsersAppState<R>>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> UserResult<StatusCode>
where
    R: UsersStore,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());

    use_case
        .update_profile(&ctx, req.user_id.as_deref(), req.profile)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/profiles/status
pub async fn update_status<R>(
    State(state): State<UsersAppState<R>>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<UpdateStatusRequest>,
) -> UserResult<StatusCode>
where
    R: UsersStore,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());

    use_case
        .update_status(&ctx, req.user_id.as_deref(), req.status)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
