use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use sqlx::sqlite::SqliteConnectOptions;
use thiserror::Error;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8001";
pub const DEFAULT_DB_FILE: &str = "courses.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid COURSES_ADDR '{0}': {1}")]
    Addr(String, #[source] std::net::AddrParseError),

    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(#[source] sqlx::Error),

    #[error("cannot resolve working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database: SqliteConnectOptions,
}

impl Config {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        let addr_raw = env::var("COURSES_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = addr_raw
            .parse()
            .map_err(|e| ConfigError::Addr(addr_raw.clone(), e))?;

        let database = match env::var("DATABASE_URL") {
            Ok(url) => SqliteConnectOptions::from_str(&url).map_err(ConfigError::DatabaseUrl)?,
            Err(_) => SqliteConnectOptions::new().filename(default_db_path()?),
        };

        Ok(Self { addr, database })
    }
}

/// `courses.db` in the directory the process was started from.
pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    Ok(env::current_dir()
        .map_err(ConfigError::WorkingDir)?
        .join(DEFAULT_DB_FILE))
}
