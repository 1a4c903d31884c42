//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Cryptographic utilities (random secrets)
//! - Password hashing (Argon2id)

pub mod crypto;
pub mod password;
