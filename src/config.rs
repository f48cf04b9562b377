use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::router::Route;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub timeout: Option<Duration>,
    pub fetch_parallelism: usize,
    pub start_route: Route,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(opt_env)
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key).and_then(|val| {
                let trimmed = val.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
        };

        let api_base = match get("CHAMP_API_BASE") {
            Some(base) => base,
            None => match (get("CHAMP_API_HOST"), get("CHAMP_API_PORT")) {
                (Some(host), Some(port)) => format!("http://{host}:{port}/api"),
                (Some(host), None) => format!("http://{host}/api"),
                _ => DEFAULT_API_BASE.to_string(),
            },
        };
        let api_base = api_base.trim_end_matches('/').to_string();

        let timeout = get("CHAMP_API_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let fetch_parallelism = get("CHAMP_FETCH_PARALLELISM")
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(4)
            .clamp(1, 16);

        let start_route = match get("CHAMP_START_ROUTE") {
            Some(raw) => Route::parse(&raw).context("invalid CHAMP_START_ROUTE")?,
            None => Route::Home,
        };

        Ok(Self {
            api_base,
            timeout,
            fetch_parallelism,
            start_route,
            log_file: get("CHAMP_LOG_FILE").map(PathBuf::from),
        })
    }
}

pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok()
}
