//! Users Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, access tokens, request context
//! - `infra/` - PostgreSQL repository and listing query builder
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Admin-only registration of users with empty profile and status rows,
//!   committed atomically
//! - Username/password sign-in issuing HMAC-signed bearer tokens
//! - Filtered, paginated user listing (admin only)
//! - Own-profile lookup and profile/status edits
//! - Idempotent admin seeding at startup
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Unknown users and wrong passwords are indistinguishable, timing included
//! - Store failures never leak driver text to clients

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::UsersConfig;
pub use application::{SeedOutcome, seed_admin};
pub use error::{UserError, UserResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::router::{users_router, users_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
