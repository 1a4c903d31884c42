//! Read models and content updates for the profile/status side of a user.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_object::UserRole;
use crate::error::{UserError, UserResult};

/// One row of the user listing (left joins, so most fields may be null)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub username: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub education: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub job_role: Option<String>,
    pub status: Option<String>,
    pub placement: Option<String>,
    pub department_name: Option<String>,
}

/// A single user's profile as seen by that user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user_id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub education: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub job_role: Option<String>,
    pub status: Option<String>,
    pub placement_city: Option<String>,
    pub department_name: Option<String>,
}

/// Partial profile edit; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub education: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub phone_number: Option<String>,
}

/// Partial status edit; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub job_role: Option<String>,
    pub status: Option<String>,
}

/// Trim, drop blanks, and enforce the column width
fn clean(field: &'static str, value: Option<String>, max: usize) -> UserResult<Option<String>> {
    let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if value.chars().count() > max {
        return Err(UserError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(Some(value))
}

impl ProfileUpdate {
    /// Normalized copy. Rejects an edit that changes nothing.
    pub fn validated(self) -> UserResult<Self> {
        let update = Self {
            name: clean("name", self.name, 255)?,
            gender: clean("gender", self.gender, 10)?,
            dob: self.dob,
            education: clean("education", self.education, 50)?,
            address: clean("address", self.address, 255)?,
            city: clean("city", self.city, 50)?,
            province: clean("province", self.province, 50)?,
            phone_number: clean("phoneNumber", self.phone_number, 50)?,
        };
        if update == Self::default() {
            return Err(UserError::Validation("No profile fields to update".into()));
        }
        Ok(update)
    }
}

impl StatusUpdate {
    pub fn validated(self) -> UserResult<Self> {
        let update = Self {
            job_role: clean("jobRole", self.job_role, 50)?,
            status: clean("status", self.status, 50)?,
        };
        if update == Self::default() {
            return Err(UserError::Validation("No status fields to update".into()));
        }
        Ok(update)
    }
}
