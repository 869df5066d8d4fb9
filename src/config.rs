//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `PORT` - Listen port (default: 8000)
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PRODUCTS_FILE` - Backing JSON file (default: ./products.json)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_PRODUCTS_FILE: &str = "./products.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// JSON file the product list is loaded from and persisted to
    pub products_file: PathBuf,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its
    /// value. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let host = match get("HOST") {
            Some(v) => v
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("HOST".into(), format!("{e}")))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match get("PORT") {
            Some(v) => v
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("PORT".into(), format!("{e}")))?,
            None => DEFAULT_PORT,
        };

        let products_file = get("PRODUCTS_FILE").map_or_else(|| PathBuf::from(DEFAULT_PRODUCTS_FILE), PathBuf::from);

        Ok(Self { host, port, products_file })
    }

    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
