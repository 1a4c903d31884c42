//! Request Context
//!
//! Identity of the caller for one request, built from a verified access
//! token and passed to use cases by parameter.

use kernel::id::UserId;

use crate::application::access_token::TokenClaims;
use crate::domain::value_object::{UserName, UserRole};
use crate::error::{UserError, UserResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Subject as carried by the token; parsed only where an id is needed
    pub user_id: String,
    pub user_name: UserName,
    pub role: UserRole,
}

impl RequestContext {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            user_name: UserName::from_db(claims.username),
            role: claims.role,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> UserResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(UserError::Forbidden("admin role required"))
        }
    }

    /// The caller's own id. A subject that is not a UUID matches no user.
    pub fn own_user_id(&self) -> UserResult<UserId> {
        self.user_id.parse().map_err(|_| UserError::UserNotFound)
    }

    /// Name recorded in `created_by` / `updated_by`
    pub fn actor(&self) -> &str {
        self.user_name.as_str()
    }
}
