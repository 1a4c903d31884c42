//! User Entity
//!
//! Write-side models: the aggregate created by registration, the credential
//! read model used by sign-in, and the audit stamp shared by every write.

use chrono::{DateTime, Utc};
use kernel::id::{ProfileId, StatusId, UserId};

use crate::domain::value_object::{UserName, UserPassword, UserRole};

/// Who changed a row, and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamp {
    pub at: DateTime<Utc>,
    pub by: String,
}

impl AuditStamp {
    pub fn now(by: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            by: by.into(),
        }
    }
}

/// A user aggregate about to be registered.
///
/// The three ids are generated here, once, and never reassigned. Profile and
/// status rows start empty.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: UserId,
    pub profile_id: ProfileId,
    pub status_id: StatusId,
    pub user_name: UserName,
    pub password: UserPassword,
    pub role: UserRole,
    pub audit: AuditStamp,
}

impl NewUser {
    pub fn new(user_name: UserName, password: UserPassword, role: UserRole, actor: &str) -> Self {
        Self {
            user_id: UserId::new(),
            profile_id: ProfileId::new(),
            status_id: StatusId::new(),
            user_name,
            password,
            role,
            audit: AuditStamp::now(actor),
        }
    }
}

/// Credentials of exactly one user
#[derive(Debug, Clone)]
pub struct Access {
    pub user_id: UserId,
    pub user_name: UserName,
    pub password: UserPassword,
    pub role: UserRole,
}
