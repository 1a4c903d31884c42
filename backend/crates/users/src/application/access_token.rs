//! Access Token
//!
//! Stateless bearer token: an HS256 JWT carrying the user id, name and role.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::UserRole;
use crate::error::{UserError, UserResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    /// Expiry, Unix epoch seconds
    pub exp: i64,
}

pub fn issue(secret: &[u8; 32], claims: &TokenClaims) -> UserResult<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| UserError::Internal(format!("Failed to sign access token: {e}")))
}

/// Every failure (bad signature, other algorithm, expired, missing claim)
/// is `TokenInvalid`.
pub fn verify(secret: &[u8; 32], token: &str) -> UserResult<TokenClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<TokenClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            UserError::TokenInvalid
        })
}
