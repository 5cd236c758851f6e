// Runtime configuration, read from the environment (and `.env` when present)

use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Where the JSON snapshot is written on shutdown and read on startup
    pub state_path: PathBuf,
    pub persist: bool,
    /// Operator-chosen admin secret; a random one is generated when absent
    pub admin_token: Option<String>,
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 1234)),
            state_path: PathBuf::from("data/state.json"),
            persist: true,
            admin_token: None,
            log_level: tracing::Level::INFO,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparsable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = lookup("ESCROW_BIND_ADDR")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.bind_addr);
        let state_path = lookup("ESCROW_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.state_path);
        let persist = lookup("ESCROW_PERSIST")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(defaults.persist);
        let admin_token = lookup("ESCROW_ADMIN_TOKEN").filter(|v| !v.trim().is_empty());
        let log_level = lookup("ESCROW_LOG_LEVEL")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.log_level);

        Self { bind_addr, state_path, persist, admin_token, log_level }
    }
}
