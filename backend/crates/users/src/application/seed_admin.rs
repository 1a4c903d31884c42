//! Admin Seeder
//!
//! Bootstraps the first admin account at startup. Safe to run on every
//! start and from several instances at once.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::UsersConfig;
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::UserName;
use crate::error::{UserError, UserResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(UserId),
    AlreadyExists,
}

pub async fn seed_admin<R>(
    repo: Arc<R>,
    config: Arc<UsersConfig>,
    user_name: String,
    password: String,
) -> UserResult<SeedOutcome>
where
    R: CredentialRepository,
{
    let name = UserName::new(&user_name).map_err(|e| UserError::Validation(e.to_string()))?;
    if repo.exists_by_username(&name).await? {
        tracing::info!(user_name = %name, "Admin account already present, skipping seed");
        return Ok(SeedOutcome::AlreadyExists);
    }

    let input = RegisterInput {
        user_name,
        password,
        role: "admin".to_string(),
    };

    match RegisterUseCase::new(repo, config).execute(None, input).await {
        Ok(output) => Ok(SeedOutcome::Created(output.user_id)),
        Err(UserError::UserNameTaken) => {
            // Another instance won the race
            tracing::info!(user_name = %name, "Admin account created concurrently, skipping seed");
            Ok(SeedOutcome::AlreadyExists)
        }
        Err(e) => Err(e),
    }
}
