//! Application Configuration
//!
//! Configuration for the Users application layer.

use std::time::Duration;

/// Default access token lifetime
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(12 * 3600);

#[derive(Clone)]
pub struct UsersConfig {
    /// HS256 key for access tokens (32 bytes)
    pub token_secret: [u8; 32],
    /// Access token lifetime (12 hours unless overridden)
    pub token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl std::fmt::Debug for UsersConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsersConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl UsersConfig {
    pub fn new(token_secret: [u8; 32]) -> Self {
        Self {
            token_secret,
            token_ttl: DEFAULT_TOKEN_TTL,
            password_pepper: None,
        }
    }

    /// Config with a random token secret; tokens die with the process
    pub fn with_random_secret() -> Self {
        Self::new(platform::crypto::random_secret())
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
