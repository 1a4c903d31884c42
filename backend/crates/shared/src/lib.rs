//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - Error classification and the unified `AppError`
//! - Typed entity identifiers
//!
//! Only things with the same meaning in every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
