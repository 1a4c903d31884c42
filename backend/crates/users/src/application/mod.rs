//! Application Layer
//!
//! Use cases and application services.

pub mod access_token;
pub mod config;
pub mod context;
pub mod get_profile;
pub mod list_users;
pub mod register;
pub mod seed_admin;
pub mod sign_in;
pub mod update_profile;

// Re-exports
pub use config::UsersConfig;
pub use context::RequestContext;
pub use get_profile::GetProfileUseCase;
pub use list_users::ListUsersUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use seed_admin::{SeedOutcome, seed_admin};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use update_profile::UpdateProfileUseCase;
