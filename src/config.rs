use std::{env, time::Duration};

use anyhow::Context;

const DEFAULT_DATABASE_URL: &str = "sqlite://techmart.db?mode=rwc";
const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = Self::database_url_from_env();
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let jwt_ttl_hours = env::var("JWT_TTL_HOURS")
            .ok()
            .and_then(|h| h.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(24);
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            jwt_ttl_hours,
        })
    }

    /// Enough for the maintenance binaries, which never sign tokens.
    pub fn database_url_from_env() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
    }
}

/// Where the storefront client finds the API and how long it waits for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_url: api_url.into(),
            timeout,
        }
    }

    pub fn from_env() -> Self {
        let api_url = env::var("TECHMART_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout = parse_timeout(env::var("TECHMART_TIMEOUT_SECS").ok().as_deref());
        Self { api_url, timeout }
    }
}

/// Seconds from `TECHMART_TIMEOUT_SECS`, or the default when unset or unparseable.
fn parse_timeout(raw: Option<&str>) -> Duration {
    let Some(raw) = raw else {
        return DEFAULT_TIMEOUT;
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(err) => {
            tracing::warn!(
                value = raw,
                error = %err,
                default_secs = DEFAULT_TIMEOUT.as_secs(),
                "invalid TECHMART_TIMEOUT_SECS, using default"
            );
            DEFAULT_TIMEOUT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_parses_seconds() {
        assert_eq!(parse_timeout(Some("3")), Duration::from_secs(3));
        assert_eq!(parse_timeout(Some(" 25 ")), Duration::from_secs(25));
    }

    #[test]
    fn timeout_falls_back_when_unset_or_invalid() {
        assert_eq!(parse_timeout(None), DEFAULT_TIMEOUT);
        assert_eq!(parse_timeout(Some("10s")), DEFAULT_TIMEOUT);
        assert_eq!(parse_timeout(Some("-1")), DEFAULT_TIMEOUT);
    }
}
