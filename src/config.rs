use crate::error::{Result, SurfaceError};
use crate::models::GridSpec;
use dotenv::dotenv;
use serde::Deserialize;
use std::env;
use std::net::{SocketAddr, ToSocketAddrs};
use std::str::FromStr;

/// Configuration for the dashboard server
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Log level
    pub log_level: String,
    /// Grid every dashboard surface is evaluated on
    pub grid: GridSpec,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8050,
            },
            log_level: "info".to_string(),
            grid: GridSpec::default(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            SurfaceError::ConfigError(format!("{} has invalid value '{}': {}", key, raw, e))
        }),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let host = lookup("DASHBOARD_HOST").unwrap_or(defaults.server.host);
        let port = parse_var(&lookup, "DASHBOARD_PORT", defaults.server.port)?;
        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);

        let grid = GridSpec {
            min_price: parse_var(&lookup, "GRID_MIN_PRICE", defaults.grid.min_price)?,
            max_price: parse_var(&lookup, "GRID_MAX_PRICE", defaults.grid.max_price)?,
            price_steps: parse_var(&lookup, "GRID_PRICE_STEPS", defaults.grid.price_steps)?,
            max_time_steps: parse_var(&lookup, "GRID_TIME_STEPS", defaults.grid.max_time_steps)?,
        };

        grid.validate()
            .map_err(|e| SurfaceError::ConfigError(format!("invalid grid: {}", e)))?;

        Ok(Config {
            server: ServerConfig { host, port },
            log_level,
            grid,
        })
    }

    /// Resolve the listen address; the host may be an IP literal or a hostname
    pub fn socket_addrs(&self) -> Result<Vec<SocketAddr>> {
        let invalid = |reason: String| {
            SurfaceError::ConfigError(format!(
                "invalid listen address {}:{}: {}",
                self.server.host, self.server.port, reason
            ))
        };

        let addrs: Vec<SocketAddr> = (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()
            .map_err(|e| invalid(e.to_string()))?
            .collect();

        if addrs.is_empty() {
            return Err(invalid("host resolved to no addresses".to_string()));
        }
        Ok(addrs)
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .map_err(|e| SurfaceError::ConfigError(format!("failed to init logging: {}", e)))?;

        Ok(())
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
    fn test_defaults_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8050);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.grid, GridSpec::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DASHBOARD_HOST", "0.0.0.0"),
            ("DASHBOARD_PORT", "9000"),
            ("LOG_LEVEL", "debug"),
            ("GRID_MIN_PRICE", "2.5"),
            ("GRID_MAX_PRICE", "30"),
            ("GRID_PRICE_STEPS", "50"),
            ("GRID_TIME_STEPS", "25"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.grid, GridSpec::new(2.5, 30.0, 50, 25));
        let addrs = config.socket_addrs().unwrap();
        assert_eq!(addrs, vec!["0.0.0.0:9000".parse::<SocketAddr>().unwrap()]);
    }

    #[test]
    fn test_unparsable_value_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[("DASHBOARD_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, SurfaceError::ConfigError(_)));
        assert!(err.to_string().contains("DASHBOARD_PORT"));
    }

    #[test]
    fn test_invalid_grid_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[
            ("GRID_MIN_PRICE", "25"),
            ("GRID_MAX_PRICE", "20"),
        ]))
        .unwrap_err();
        assert!(matches!(err, SurfaceError::ConfigError(_)));
    }

    #[test]
    fn test_hostname_resolves() {
        let config = Config::from_lookup(lookup_from(&[("DASHBOARD_HOST", "localhost")])).unwrap();
        let addrs = config.socket_addrs().unwrap();
        assert!(addrs.iter().all(|a| a.ip().is_loopback() && a.port() == 8050));
    }

    #[test]
    fn test_bad_host_fails_socket_addrs() {
        let mut config = Config::default();
        config.server.host = "not a host".to_string();
        let err = config.socket_addrs().unwrap_err();
        assert!(matches!(err, SurfaceError::ConfigError(_)));
    }
}
