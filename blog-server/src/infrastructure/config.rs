use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = parse_or(&lookup, "PORT", 8080)?;
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            lookup("JWT_SECRET").ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let jwt_expiration_hours = parse_or(&lookup, "JWT_EXPIRATION_HOURS", 24)?;
        if jwt_expiration_hours <= 0 {
            anyhow::bail!("JWT_EXPIRATION_HOURS must be positive");
        }
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 20)?;
        let db_min_connections = parse_or(&lookup, "DB_MIN_CONNECTIONS", 5)?;
        let db_acquire_timeout_secs = parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?;
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            db_max_connections,
            db_min_connections,
            db_acquire_timeout_secs,
            cors_origins,
        })
    }

    pub fn db_acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.db_acquire_timeout_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", key, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_keys_set() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/blog"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_expiration_hours, 24);
        assert_eq!(config.db_max_connections, 20);
        assert_eq!(config.db_min_connections, 5);
        assert_eq!(config.db_acquire_timeout(), Duration::from_secs(5));
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/blog"),
            ("JWT_SECRET", "secret"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,,"),
        ]))
        .unwrap();

        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "secret")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/blog"),
            ("JWT_SECRET", "secret"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("invalid PORT"));
    }
}
