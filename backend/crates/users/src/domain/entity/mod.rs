pub mod user;
pub mod views;

pub use user::{Access, AuditStamp, NewUser};
pub use views::{ProfileUpdate, ProfileView, StatusUpdate, UserView};
