use std::{fmt::Display, num::NonZeroU32, path::PathBuf, str::FromStr, time::Duration};

use anyhow::anyhow;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub media_root: PathBuf,
    pub session_idle_minutes: NonZeroU32,
    pub room_cache_ttl: Option<Duration>,
    /// Room state goes to Redis when set, otherwise it stays in process.
    pub redis_url: Option<String>,
    pub secure_cookies: bool,
}

impl Config {
    /// Reads the environment, after pulling in a `.env` file if one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            info!("loaded {}", path.display());
        }

        Ok(Self {
            database_url: try_load("DATABASE_URL", "sqlite://lobby.db?mode=rwc")?,
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:8080")?,
            media_root: try_load::<String>("MEDIA_ROOT", "media")?.into(),
            session_idle_minutes: try_load("SESSION_IDLE_MINUTES", "60")?,
            room_cache_ttl: load_optional::<u64>("ROOM_CACHE_TTL_SECS")?.map(Duration::from_secs),
            redis_url: load_optional("REDIS_URL")?,
            secure_cookies: try_load("SECURE_COOKIES", "false")?,
        })
    }

    pub fn avatar_dir(&self) -> PathBuf {
        self.media_root.join("avatars")
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = dotenv::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    });
    raw.parse().map_err(|e| anyhow!("invalid {key} value {raw:?}: {e}"))
}

fn load_optional<T: FromStr>(key: &str) -> anyhow::Result<Option<T>>
where
    T::Err: Display,
{
    match dotenv::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| anyhow!("invalid {key} value {raw:?}: {e}")),
        Err(_) => Ok(None),
    }
}
