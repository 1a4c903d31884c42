//! Update Profile / Status Use Case
//!
//! Users edit their own profile and status. Admins may edit anyone's.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::context::RequestContext;
use crate::domain::entity::{AuditStamp, ProfileUpdate, StatusUpdate};
use crate::domain::repository::ProfileRepository;
use crate::error::{UserError, UserResult};

pub struct UpdateProfileUseCase<R>
where
    R: ProfileRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: ProfileRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        target: Option<&str>,
        update: ProfileUpdate,
    ) -> UserResult<()> {
        let user_id = resolve_target(ctx, target)?;
        let update = update.validated()?;
        let audit = AuditStamp::now(ctx.actor());

        if !self.repo.update_profile(&user_id, &update, &audit).await? {
            return Err(UserError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, updated_by = %audit.by, "Profile updated");
        Ok(())
    }

    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        target: Option<&str>,
        update: StatusUpdate,
    ) -> UserResult<()> {
        let user_id = resolve_target(ctx, target)?;
        let update = update.validated()?;
        let audit = AuditStamp::now(ctx.actor());

        if !self.repo.update_status(&user_id, &update, &audit).await? {
            return Err(UserError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, updated_by = %audit.by, "Status updated");
        Ok(())
    }
}

/// The caller's own id, or `target` when the caller is an admin
fn resolve_target(ctx: &RequestContext, target: Option<&str>) -> UserResult<UserId> {
    match target.map(str::trim).filter(|t| !t.is_empty()) {
        None => ctx.own_user_id(),
        Some(t) if t == ctx.user_id => ctx.own_user_id(),
        Some(t) => {
            ctx.require_admin()?;
            t.parse().map_err(|_| UserError::UserNotFound)
        }
    }
}
