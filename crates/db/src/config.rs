use labimport_core::error::CoreError;

const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Database configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL connection URL (required).
    pub database_url: String,
    /// Pool size (default: `20`).
    pub max_connections: u32,
    /// Seconds to wait for a free connection (default: `5`).
    pub acquire_timeout_secs: u64,
}

impl DbConfig {
    /// Load configuration from the environment, reading `.env` first if
    /// present.
    ///
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `DATABASE_URL`            | none    |
    /// | `DB_MAX_CONNECTIONS`      | `20`    |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`     |
    pub fn from_env() -> Result<Self, CoreError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| CoreError::Config("DATABASE_URL must be set".into()))?;

        let max_connections =
            parse_or_default(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(CoreError::Config(
                "DB_MAX_CONNECTIONS must be at least 1".into(),
            ));
        }
        let acquire_timeout_secs = parse_or_default(
            &lookup,
            "DB_ACQUIRE_TIMEOUT_SECS",
            DEFAULT_ACQUIRE_TIMEOUT_SECS,
        )?;

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout_secs,
        })
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, CoreError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CoreError::Config(format!("{key} must be a number, got {raw:?}"))),
    }
}
