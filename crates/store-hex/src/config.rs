use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: String,
    /// `None` when `DATABASE_URL` is unset; the binary then falls back to
    /// `store_repo::DEFAULT_DATABASE_URL`.
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "3000".into());
        if server_port.parse::<u16>().is_err() {
            anyhow::bail!("SERVER_PORT must be a port number, got {server_port:?}");
        }
        let database_url = env::var("DATABASE_URL").ok();
        Ok(Self {
            server_host,
            server_port,
            database_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns the process environment so nothing races on it.
    #[test]
    fn reads_env_with_defaults() {
        env::remove_var("SERVER_HOST");
        env::remove_var("DATABASE_URL");
        env::set_var("SERVER_PORT", "not-a-port");
        assert!(Config::from_env().is_err());

        env::remove_var("SERVER_PORT");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.server_host, "0.0.0.0");
        assert_eq!(cfg.server_port, "3000");
        assert!(cfg.database_url.is_none());

        env::set_var("DATABASE_URL", "sqlite::memory:");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.database_url.as_deref(), Some("sqlite::memory:"));
        env::remove_var("DATABASE_URL");
    }
}
