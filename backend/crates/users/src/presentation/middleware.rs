//! Access Token Middleware
//!
//! Verifies the `Authorization: Bearer` token and puts the caller's
//! [`RequestContext`] into the request extensions.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::application::access_token;
use crate::application::config::UsersConfig;
use crate::application::context::RequestContext;
use crate::error::{UserError, UserResult};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Reject the request with 401 unless it carries a valid, unexpired token
pub async fn require_access_token(
    State(config): State<Arc<UsersConfig>>,
    mut req: Request,
    next: Next,
) -> UserResult<Response> {
    let token = bearer_token(req.headers()).ok_or(UserError::TokenInvalid)?;
    let claims = access_token::verify(&config.token_secret, token)?;

    req.extensions_mut().insert(RequestContext::from_claims(claims));

    Ok(next.run(req).await)
}
