use std::{env, fmt, str::FromStr};

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT {0:?}: expected a number between 0 and 65535")]
    InvalidPort(String),
    #[error("invalid PINTAR_STORE {0:?}: expected \"mongodb\" or \"memory\"")]
    UnknownStore(String),
}

/// Which backend the service stores records in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreKind {
    #[default]
    MongoDb,
    Memory,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreKind::MongoDb),
            "memory" => Ok(StoreKind::Memory),
            _ => Err(ConfigError::UnknownStore(s.to_string())),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::MongoDb => write!(f, "mongodb"),
            StoreKind::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            database_name: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            store: StoreKind::default(),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment, after loading `.env`
    /// if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Config {
            database_url: var("DATABASE_URL"),
            database_name: var("DATABASE_NAME"),
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: match var("PORT") {
                Some(port) => port
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort(port))?,
                None => DEFAULT_PORT,
            },
            store: match var("PINTAR_STORE") {
                Some(store) => store.parse()?,
                None => StoreKind::default(),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
