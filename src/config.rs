use std::env;
use std::path::PathBuf;

use crate::data::catalogue::DEFAULT_CATALOGUE_PATH;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Process settings read from `MEMORIA_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: String,
    pub catalogue: PathBuf,
    /// Rayon worker threads for catalogue validation; 0 = Rayon default.
    pub workers: usize,
    pub log_filter: String,
    pub log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            catalogue: PathBuf::from(DEFAULT_CATALOGUE_PATH),
            workers: 0,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults and
    /// an unparsable worker count falls back to 0.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            bind: get("MEMORIA_BIND").unwrap_or(defaults.bind),
            catalogue: get("MEMORIA_CATALOGUE")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalogue),
            workers: get("MEMORIA_WORKERS")
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(defaults.workers),
            log_filter: get("MEMORIA_LOG").unwrap_or(defaults.log_filter),
            log_path: get("MEMORIA_LOG_PATH").map(PathBuf::from),
        }
    }
}
