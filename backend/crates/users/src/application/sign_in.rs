//! Sign In Use Case
//!
//! Verifies a username/password pair and issues an access token.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;

use crate::application::access_token::{self, TokenClaims};
use crate::application::config::UsersConfig;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{RawPassword, UserName, UserPassword, UserRole};
use crate::error::{UserError, UserResult};

pub struct SignInInput {
    pub user_name: String,
    pub password: String,
}

pub struct SignInOutput {
    pub user_id: UserId,
    pub access_token: String,
    pub expires_at_ms: i64,
    pub role: UserRole,
}

impl std::fmt::Debug for SignInOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInOutput")
            .field("user_id", &self.user_id)
            .field("access_token", &"[REDACTED]")
            .field("expires_at_ms", &self.expires_at_ms)
            .field("role", &self.role)
            .finish()
    }
}

pub struct SignInUseCase<R>
where
    R: CredentialRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> SignInUseCase<R>
where
    R: CredentialRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> UserResult<SignInOutput> {
        let raw_password = RawPassword::for_sign_in(input.password);

        // A name that could never have been registered is just an unknown user
        let access = match UserName::new(&input.user_name) {
            Ok(user_name) => self.repo.find_by_username(&user_name).await?,
            Err(_) => None,
        };

        // Unknown users still pay for one Argon2 verification
        let pepper = self.config.password_pepper.clone();
        let verified = tokio::task::spawn_blocking(move || match access {
            Some(access) if access.password.verify(&raw_password, pepper.as_deref()) => {
                Some(access)
            }
            Some(_) => None,
            None => {
                UserPassword::verify_dummy(&raw_password, pepper.as_deref());
                None
            }
        })
        .await
        .map_err(|e| UserError::Internal(format!("Verification task failed: {e}")))?;

        let access = verified.ok_or(UserError::InvalidCredentials)?;

        // JWT expiry has whole-second precision
        let exp = Utc::now().timestamp() + self.config.token_ttl.as_secs() as i64;
        let claims = TokenClaims {
            sub: access.user_id.to_string(),
            username: access.user_name.as_str().to_string(),
            role: access.role,
            exp,
        };
        let token = access_token::issue(&self.config.token_secret, &claims)?;

        tracing::info!(
            user_id = %access.user_id,
            role = %access.role,
            "User signed in"
        );

        Ok(SignInOutput {
            user_id: access.user_id,
            access_token: token,
            expires_at_ms: exp * 1000,
            role: access.role,
        })
    }
}
