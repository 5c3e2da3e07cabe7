use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::{self, Error};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Postgres URI; without one the console keeps its data in memory.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub log_filter: String,
}

impl Config {
    /// Reads `CLUBHOUSE_*` variables, after loading a `.env` file if present.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let optional = |key: &str| match lookup(key) {
            Ok(value) if !value.trim().is_empty() => Ok(Some(value)),
            Ok(_) | Err(env::VarError::NotPresent) => Ok(None),
            Err(err) => Err(Error::from(err)),
        };

        Ok(Self {
            database_url: optional("CLUBHOUSE_DATABASE_URL")?,
            max_connections: parse_or(
                optional("CLUBHOUSE_MAX_CONNECTIONS")?,
                DEFAULT_MAX_CONNECTIONS,
            )?,
            bind_addr: parse_or(
                optional("CLUBHOUSE_BIND_ADDR")?,
                DEFAULT_BIND_ADDR.parse::<SocketAddr>().map_err(|_| error::unexpected_error())?,
            )?,
            log_filter: optional("CLUBHOUSE_LOG")?.unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> Result<T, Error> {
    match value {
        Some(value) => value.trim().parse().map_err(|_| {
            tracing::error!(%value, "unparsable configuration value");
            error::invalid_input_error()
        }),
        None => Ok(default),
    }
}

#[test]
fn defaults_apply_when_unset() {
    let config = Config::from_lookup(|_| Err(env::VarError::NotPresent)).unwrap();

    assert_eq!(config.database_url, None);
    assert_eq!(config.max_connections, 5);
    assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
    assert_eq!(config.log_filter, "info");
}

#[test]
fn values_are_parsed() {
    let config = Config::from_lookup(|key| match key {
        "CLUBHOUSE_DATABASE_URL" => Ok("postgresql://clubhouse@localhost/clubhouse".into()),
        "CLUBHOUSE_MAX_CONNECTIONS" => Ok("12".into()),
        "CLUBHOUSE_BIND_ADDR" => Ok("0.0.0.0:8080".into()),
        _ => Err(env::VarError::NotPresent),
    })
    .unwrap();

    assert_eq!(
        config.database_url.as_deref(),
        Some("postgresql://clubhouse@localhost/clubhouse")
    );
    assert_eq!(config.max_connections, 12);
    assert_eq!(config.bind_addr.port(), 8080);

    let err = Config::from_lookup(|key| match key {
        "CLUBHOUSE_MAX_CONNECTIONS" => Ok("many".into()),
        _ => Err(env::VarError::NotPresent),
    })
    .unwrap_err();
    assert!(err.is_invalid_input_error());
}
