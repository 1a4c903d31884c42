//! Cryptographic Utilities
//!
//! Random key material for access token signing.

use rand::{RngCore, rngs::OsRng};

/// Generate a 256-bit secret from the OS RNG
pub fn random_secret() -> [u8; 32] {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}
