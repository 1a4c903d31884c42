//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::{
    Access, AuditStamp, NewUser, ProfileUpdate, ProfileView, StatusUpdate, UserView,
};
use crate::domain::value_object::{PageRequest, UserFilter, UserName};
use crate::error::UserResult;

/// Credentials: registration and username-keyed lookups
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Persist user, profile and status rows atomically.
    ///
    /// A taken username is [`UserError::UserNameTaken`](crate::error::UserError)
    /// and leaves no rows behind.
    async fn register(&self, user: &NewUser) -> UserResult<UserId>;

    /// `Ok(None)` when no row matches
    async fn find_by_username(&self, user_name: &UserName) -> UserResult<Option<Access>>;

    /// Best-effort pre-check; the unique constraint stays authoritative
    async fn exists_by_username(&self, user_name: &UserName) -> UserResult<bool>;
}

/// Read side: filtered listing and single-profile lookup
#[trait_variant::make(UserQueryRepository: Send)]
pub trait LocalUserQueryRepository {
    /// One page of users matching `filter`, plus the total match count.
    ///
    /// Both come from the same snapshot.
    async fn list(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> UserResult<(Vec<UserView>, u64)>;

    async fn find_profile(&self, user_id: &UserId) -> UserResult<Option<ProfileView>>;
}

/// Content edits of the linked profile/status rows.
///
/// Each call also re-stamps the owning user's `updated_at`/`updated_by` in
/// the same transaction. `Ok(false)` when the user or its linked row is
/// missing.
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
        audit: &AuditStamp,
    ) -> UserResult<bool>;

    async fn update_status(
        &self,
        user_id: &UserId,
        update: &StatusUpdate,
        audit: &AuditStamp,
    ) -> UserResult<bool>;
}
