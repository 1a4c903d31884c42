//! Value Objects

pub mod page;
pub mod user_filter;
pub mod user_name;
pub mod user_password;
pub mod user_role;

pub use page::{Page, PageRequest};
pub use user_filter::{FilterField, UserFilter};
pub use user_name::UserName;
pub use user_password::{RawPassword, UserPassword};
pub use user_role::UserRole;
