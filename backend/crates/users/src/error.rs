//! Users Error Types
//!
//! Domain error variants that convert into the unified
//! `kernel::error::AppError` at the HTTP edge.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx_error, kind::ErrorKind};
use thiserror::Error;

pub type UserResult<T> = Result<T, UserError>;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,

    #[error("User name already exists")]
    UserNameTaken,

    /// Unknown user or wrong password; the two are never told apart
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, tampered or expired access token
    #[error("Invalid or expired access token")]
    TokenInvalid,

    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    /// A store call did not finish within the configured deadline
    #[error("Store call timed out")]
    StoreTimeout,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::UserNotFound => ErrorKind::NotFound,
            UserError::UserNameTaken => ErrorKind::Conflict,
            UserError::InvalidCredentials | UserError::TokenInvalid => ErrorKind::Unauthorized,
            UserError::Forbidden(_) => ErrorKind::Forbidden,
            UserError::Validation(_) | UserError::PasswordValidation(_) => ErrorKind::BadRequest,
            UserError::StoreTimeout => ErrorKind::ServiceUnavailable,
            UserError::Database(e) => classify_sqlx_error(e).0,
            UserError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Convert to the client-facing `AppError`.
    ///
    /// Store and internal failures get a generic message; their details are
    /// only logged.
    pub fn into_app_error(self) -> AppError {
        match self {
            UserError::Database(e) => AppError::from(e),
            UserError::Internal(_) => AppError::internal("Internal server error"),
            UserError::StoreTimeout => AppError::service_unavailable("Database did not respond in time")
                .with_action("Please retry later"),
            UserError::UserNameTaken => AppError::conflict("User name already exists")
                .with_action("Choose a different user name"),
            UserError::TokenInvalid => AppError::unauthorized("Invalid or expired access token")
                .with_action("Sign in again"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            UserError::Database(e) => {
                tracing::error!(error = %e, "Users database error");
            }
            UserError::Internal(msg) => {
                tracing::error!(message = %msg, "Users internal error");
            }
            UserError::StoreTimeout => {
                tracing::error!("Users store call exceeded its deadline");
            }
            UserError::InvalidCredentials => {
                tracing::warn!("Invalid sign-in attempt");
            }
            UserError::Forbidden(reason) => {
                tracing::warn!(reason = %reason, "Forbidden request");
            }
            _ => {
                tracing::debug!(error = %self, "Users error");
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
