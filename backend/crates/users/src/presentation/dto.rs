//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::{ProfileUpdate, StatusUpdate};
use crate::domain::value_object::{PageRequest, UserFilter, UserRole};

// ============================================================================
// Sign In
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at_ms: i64,
    pub role: UserRole,
}

// ============================================================================
// Register
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: String,
}

// ============================================================================
// Listing
// ============================================================================

/// `GET /users` query string.
///
/// `page` and `size` stay strings so that a non-numeric value falls back to
/// the default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub name: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub job_role: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

impl ListUsersQuery {
    pub fn into_parts(self) -> (UserFilter, PageRequest) {
        let page = PageRequest::from_query(self.page.as_deref(), self.size.as_deref());
        let filter = UserFilter::new(
            self.name,
            self.city,
            self.province,
            self.job_role,
            self.status,
        );
        (filter, page)
    }
}

// ============================================================================
// Profile / Status updates
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// Target user; admins only, defaults to the caller
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileUpdate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub status: StatusUpdate,
}
