//! List Users Use Case
//!
//! Filtered, paginated listing. Admin only.

use std::sync::Arc;

use crate::application::context::RequestContext;
use crate::domain::entity::UserView;
use crate::domain::repository::UserQueryRepository;
use crate::domain::value_object::{Page, PageRequest, UserFilter};
use crate::error::UserResult;

pub struct ListUsersUseCase<R>
where
    R: UserQueryRepository,
{
    repo: Arc<R>,
}

impl<R> ListUsersUseCase<R>
where
    R: UserQueryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        ctx: &RequestContext,
        filter: UserFilter,
        page: PageRequest,
    ) -> UserResult<Page<UserView>> {
        ctx.require_admin()?;

        let (data, total) = self.repo.list(&filter, &page).await?;

        tracing::debug!(
            page = page.page(),
            size = page.size(),
            returned = data.len(),
            total,
            "Listed users"
        );

        Ok(Page::new(data, total, page))
    }
}
