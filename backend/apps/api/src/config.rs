//! Process configuration read from the environment (after `.env` is loaded).

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use base64::Engine;
use base64::engine::general_purpose;
use users::UsersConfig;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[derive(Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    /// `None` when `TOKEN_SECRET` is unset
    pub token_secret: Option<[u8; 32]>,
    pub token_ttl: Option<Duration>,
    pub password_pepper: Option<Vec<u8>>,
    /// Deadline for one store call; also the pool acquire timeout
    pub store_timeout: Duration,
    pub frontend_origins: Vec<String>,
    pub seed_admin: Option<SeedAdmin>,
}

#[derive(Clone)]
pub struct SeedAdmin {
    pub user_name: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("user_name", &self.user_name)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

        let database_max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if database_max_connections == 0 {
            bail!("DATABASE_MAX_CONNECTIONS must be a positive integer");
        }

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:31113")?;

        let token_secret = var("TOKEN_SECRET")
            .map(|v| decode_secret(&v))
            .transpose()?;

        let token_ttl = var("TOKEN_TTL_SECS")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .context("TOKEN_TTL_SECS must be a positive number of seconds")
            })
            .transpose()?;

        let store_timeout = match var("STORE_TIMEOUT_MS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .context("STORE_TIMEOUT_MS must be a positive number of milliseconds")?,
            None => Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
        };

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        let seed_admin = match (var("SEED_ADMIN_USERNAME"), var("SEED_ADMIN_PASSWORD")) {
            (Some(user_name), Some(password)) => Some(SeedAdmin {
                user_name,
                password,
            }),
            (None, None) => None,
            _ => bail!("SEED_ADMIN_USERNAME and SEED_ADMIN_PASSWORD must be set together"),
        };

        Ok(Self {
            database_url,
            database_max_connections,
            bind_addr,
            token_secret,
            token_ttl,
            password_pepper: var("PASSWORD_PEPPER").map(String::into_bytes),
            store_timeout,
            frontend_origins,
            seed_admin,
        })
    }

    /// Users crate config. A missing token secret is only tolerated when
    /// `allow_random_secret` is set (debug builds).
    pub fn users_config(&self, allow_random_secret: bool) -> anyhow::Result<UsersConfig> {
        let mut config = match self.token_secret {
            Some(secret) => UsersConfig::new(secret),
            None if allow_random_secret => {
                tracing::warn!("TOKEN_SECRET not set, using a random secret for this process");
                UsersConfig::development()
            }
            None => bail!("TOKEN_SECRET must be set in production"),
        };

        if let Some(ttl) = self.token_ttl {
            config.token_ttl = ttl;
        }
        config.password_pepper = self.password_pepper.clone();
        Ok(config)
    }
}

fn decode_secret(value: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(value.trim())
        .context("TOKEN_SECRET must be base64")?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| anyhow::anyhow!("TOKEN_SECRET must decode to 32 bytes, got {}", bytes.len()))
}
