//! Runtime configuration for the Pickup server.

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    /// Postgres connection string. `None` runs on the in-process store.
    pub database_url: Option<String>,
    /// Postgres pool size.
    pub db_max_connections: u32,
    /// Redis URL for the session store. `None` keeps sessions in-process.
    pub redis_url: Option<String>,
    /// Session lifetime (seconds), refreshed on every authenticated call.
    pub session_ttl: u64,
    /// HTTP bind address.
    pub server_addr: String,
}

impl Settings {
    fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);

        let redis_url = env::var("REDIS_URL").ok().filter(|v| !v.is_empty());

        let session_ttl = session_ttl(env::var("SESSION_TTL").ok());

        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into());

        Settings {
            database_url,
            db_max_connections,
            redis_url,
            session_ttl,
            server_addr,
        }
    }
}

const DEFAULT_SESSION_TTL: u64 = 7 * 24 * 3_600; // one week

/// Unparsable or zero falls back to the default; Redis rejects `EX 0`.
fn session_ttl(raw: Option<String>) -> u64 {
    match raw.as_deref().map(str::parse::<u64>) {
        Some(Ok(0)) => {
            log::warn!("SESSION_TTL=0 ignored, using {DEFAULT_SESSION_TTL}s");
            DEFAULT_SESSION_TTL
        }
        Some(Ok(secs)) => secs,
        _ => DEFAULT_SESSION_TTL,
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ttl_never_zero() {
        assert_eq!(session_ttl(Some("0".into())), DEFAULT_SESSION_TTL);
        assert_eq!(session_ttl(Some("nope".into())), DEFAULT_SESSION_TTL);
        assert_eq!(session_ttl(None), DEFAULT_SESSION_TTL);
        assert_eq!(session_ttl(Some("90".into())), 90);
    }
}
