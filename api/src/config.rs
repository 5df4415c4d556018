use std::env;

use anyhow::{bail, Context};

const DEV_TOKEN_SECRET: &str = "dev-secret-not-for-production";

/// Where the catalog keeps its records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Database,
}

/// Credentials for the administrator created at startup
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone)]
pub struct Config {
    pub storage: StorageBackend,
    /// Only read when `storage` is `Database`
    pub database_url: String,
    pub token_secret: String,
    pub token_ttl_seconds: i64,
    pub password_hash_rounds: u32,
    pub admin: Option<AdminBootstrap>,
    pub login_rate_limit: bool,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let storage = match lookup("STORAGE_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("memory") => StorageBackend::Memory,
            Some("database") | Some("db") => StorageBackend::Database,
            Some(other) => bail!("STORAGE_BACKEND must be 'memory' or 'database', got '{other}'"),
        };

        let token_secret = match lookup("TOKEN_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("TOKEN_SECRET not set, using the development secret");
                DEV_TOKEN_SECRET.to_string()
            }
        };

        let admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap {
                email,
                password,
                first_name: lookup("ADMIN_FIRST_NAME").unwrap_or_else(|| "Admin".to_string()),
                last_name: lookup("ADMIN_LAST_NAME").unwrap_or_else(|| "User".to_string()),
            }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!("ADMIN_EMAIL and ADMIN_PASSWORD must both be set to bootstrap an admin");
                None
            }
            (None, None) => None,
        };

        Ok(Self {
            storage,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite::memory:".to_string()),
            token_secret,
            token_ttl_seconds: parsed(&lookup, "TOKEN_TTL_SECONDS", 3600)?,
            password_hash_rounds: parsed(&lookup, "PASSWORD_HASH_ROUNDS", 10_000)?,
            admin,
            login_rate_limit: parsed(&lookup, "LOGIN_RATE_LIMIT", true)?,
            port: parsed(&lookup, "PORT", 8080)?,
        })
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}
