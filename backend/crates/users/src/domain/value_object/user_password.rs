//! User Password Value Object
//!
//! Domain wrapper over `platform::password`: maps policy and hashing
//! failures onto [`UserError`].

use platform::password::{self, ClearTextPassword, HashedPassword};
use std::fmt;

use crate::error::{UserError, UserResult};

/// Password as submitted by a client (zeroized on drop)
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Password for a new account. The policy applies.
    pub fn new(raw: String) -> UserResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|e| UserError::PasswordValidation(e.to_string()))
    }

    /// Password submitted at sign-in. No policy, it is only compared.
    pub fn for_sign_in(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// Argon2id PHC hash as stored in `users.password_hash`
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> UserResult<Self> {
        raw.0
            .hash(pepper)
            .map(Self)
            .map_err(|e| UserError::Internal(e.to_string()))
    }

    /// Parse a stored hash; a corrupt row is an internal error
    pub fn from_db(phc: &str) -> UserResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| UserError::Internal(e.to_string()))
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(&raw.0, pepper)
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Burn the same CPU as [`verify`](Self::verify) for an unknown user
    pub fn verify_dummy(raw: &RawPassword, pepper: Option<&[u8]>) {
        password::verify_dummy(&raw.0, pepper);
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}
