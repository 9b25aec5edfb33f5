//! Configuration for the Blokhouse gateway.

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8480;

/// Default asset catalog path.
pub const DEFAULT_ASSETS_PATH: &str = "assets.yaml";

/// Gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,
    /// Address to bind the HTTP server to.
    pub bind: IpAddr,
    /// Asset catalog file (YAML or JSON).
    pub assets_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }
}

impl Config {
    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unset, empty or unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            port: get("BLOKHOUSE_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            bind: get("BLOKHOUSE_BIND")
                .and_then(|s| s.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            assets_path: get("BLOKHOUSE_ASSETS")
                .map_or_else(|| PathBuf::from(DEFAULT_ASSETS_PATH), PathBuf::from),
        }
    }
}
