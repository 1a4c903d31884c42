//! Get Profile Use Case

use std::sync::Arc;

use crate::application::context::RequestContext;
use crate::domain::entity::ProfileView;
use crate::domain::repository::UserQueryRepository;
use crate::error::{UserError, UserResult};

pub struct GetProfileUseCase<R>
where
    R: UserQueryRepository,
{
    repo: Arc<R>,
}

impl<R> GetProfileUseCase<R>
where
    R: UserQueryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Profile of the caller, keyed by the token's subject
    pub async fn execute(&self, ctx: &RequestContext) -> UserResult<ProfileView> {
        let user_id = ctx.own_user_id()?;

        self.repo
            .find_profile(&user_id)
            .await?
            .ok_or(UserError::UserNotFound)
    }
}
