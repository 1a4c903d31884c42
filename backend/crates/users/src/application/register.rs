//! Register Use Case
//!
//! Creates a user together with its empty profile and status rows.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::UsersConfig;
use crate::application::context::RequestContext;
use crate::domain::entity::NewUser;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{RawPassword, UserName, UserPassword, UserRole};
use crate::error::{UserError, UserResult};

pub struct RegisterInput {
    pub user_name: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: UserId,
}

pub struct RegisterUseCase<R>
where
    R: CredentialRepository,
{
    repo: Arc<R>,
    config: Arc<UsersConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: CredentialRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<UsersConfig>) -> Self {
        Self { repo, config }
    }

    /// Register a new account.
    ///
    /// With a caller context the caller must be an admin and is recorded as
    /// the creator. Without one (bootstrap seeding) the new user is recorded
    /// as its own creator.
    pub async fn execute(
        &self,
        ctx: Option<&RequestContext>,
        input: RegisterInput,
    ) -> UserResult<RegisterOutput> {
        if let Some(ctx) = ctx {
            ctx.require_admin()?;
        }

        let user_name =
            UserName::new(&input.user_name).map_err(|e| UserError::Validation(e.to_string()))?;
        let role = input
            .role
            .parse::<UserRole>()
            .map_err(|e| UserError::Validation(e.to_string()))?;
        let raw_password = RawPassword::new(input.password)?;

        // Fast path only; the unique constraint decides races
        if self.repo.exists_by_username(&user_name).await? {
            return Err(UserError::UserNameTaken);
        }

        let pepper = self.config.password_pepper.clone();
        let password = tokio::task::spawn_blocking(move || {
            UserPassword::from_raw(&raw_password, pepper.as_deref())
        })
        .await
        .map_err(|e| UserError::Internal(format!("Hashing task failed: {e}")))??;

        let actor = match ctx {
            Some(ctx) => ctx.actor().to_string(),
            None => user_name.as_str().to_string(),
        };

        let user = NewUser::new(user_name, password, role, &actor);
        let user_id = self.repo.register(&user).await?;

        tracing::info!(
            user_id = %user_id,
            user_name = %user.user_name,
            role = %user.role,
            created_by = %actor,
            "User registered"
        );

        Ok(RegisterOutput { user_id })
    }
}
