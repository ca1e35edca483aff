//! Service configuration read from the environment.
//!
//! - `TELECOM_DATA_PATH`: inventory database (default `/data/telecom.db`)
//! - `SERVICE_PORT`: HTTP port (default 8080)
//! - `TELECOM_ALLOW_DEFAULT_POINT`: substitute the default query point when
//!   coordinates are omitted (default true)

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default location of the inventory database inside the container.
pub const DEFAULT_DATA_PATH: &str = "/data/telecom.db";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub data_path: PathBuf,
    pub port: u16,
    pub allow_default_point: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            port: DEFAULT_PORT,
            allow_default_point: true,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup. Unparseable
    /// values fall back to the defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_path = lookup("TELECOM_DATA_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let port = match lookup("SERVICE_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid SERVICE_PORT; using default");
                defaults.port
            }),
            None => defaults.port,
        };

        let allow_default_point = match lookup("TELECOM_ALLOW_DEFAULT_POINT") {
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "invalid TELECOM_ALLOW_DEFAULT_POINT; using default");
                defaults.allow_default_point
            }),
            None => defaults.allow_default_point,
        };

        Self {
            data_path,
            port,
            allow_default_point,
        }
    }

    /// Address to bind on all interfaces.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
