//! Server configuration
//!
//! Values come from the process environment (optionally seeded from a
//! `.env` file by the binary). Unset variables fall back to the defaults:
//! `0.0.0.0:80` and the standard artifact path.

use housing::DEFAULT_MODEL_PATH;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("PORT must be a valid number, got '{0}'")]
    InvalidPort(String),

    #[error("HOST must be an IPv4 or IPv6 address, got '{0}'")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `MODEL_PATH` from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
        })
    }

    /// Bind address; IPv6 hosts may be given with or without brackets
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.host.trim();
        let bare = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        let ip: IpAddr = bare
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
