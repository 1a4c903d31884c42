//! Users Router

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::UsersConfig;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, UsersAppState, UsersStore};
use crate::presentation::middleware::require_access_token;

/// Create the Users router with PostgreSQL repository
pub fn users_router(repo: PgUserRepository, config: UsersConfig) -> Router {
    users_router_generic(repo, config)
}

/// Create a Users router for any repository implementation.
///
/// Everything except sign-in sits behind the access token middleware.
pub fn users_router_generic<R>(repo: R, config: UsersConfig) -> Router
where
    R: UsersStore,
{
    let state = UsersAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    let protected = Router::new()
        .route("/auth/register", post(handlers::register::<R>))
        .route("/users", get(handlers::list_users::<R>))
        .route(
            "/profiles",
            get(handlers::get_profile::<R>).put(handlers::update_profile::<R>),
        )
        .route("/profiles/status", put(handlers::update_status::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.config.clone(),
            require_access_token,
        ));

    Router::new()
        .route("/auth/signin", post(handlers::sign_in::<R>))
        .merge(protected)
        .with_state(state)
}
