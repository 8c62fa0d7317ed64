//! Server configuration from environment variables.

use std::path::PathBuf;

/// Runtime settings for the web binary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// `HOST`, default `0.0.0.0` so the app is reachable from outside a VPS.
    pub host: String,
    /// `PORT`, default 8080.
    pub port: u16,
    /// `DATA_DIR`: where the JSON collections live.
    pub data_dir: PathBuf,
    /// `ROSTER_CSV`: optional `id,name` roster merged in at startup.
    pub roster_csv: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable lookup. Unset, empty or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let port = match get("PORT") {
            Some(p) => p.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{}', using {}", p, default_port());
                default_port()
            }),
            None => default_port(),
        };
        Self {
            host: get("HOST").unwrap_or_else(default_host),
            port,
            data_dir: get("DATA_DIR").map(PathBuf::from).unwrap_or_else(default_data_dir),
            roster_csv: get("ROSTER_CSV").map(PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
