//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::{UsersAppState, UsersStore};
pub use middleware::require_access_token;
pub use router::{users_router, users_router_generic};
