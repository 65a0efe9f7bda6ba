//! Process configuration read from the environment.

use std::net::SocketAddr;

pub const BIND_ADDR_ENV: &str = "INNKEEP_BIND_ADDR";
pub const SEED_DEMO_ENV: &str = "INNKEEP_SEED_DEMO";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Load a small demo inventory at startup.
    pub seed_demo: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            seed_demo: false,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let bind_addr = match lookup(BIND_ADDR_ENV) {
            Some(raw) => raw.parse::<SocketAddr>().unwrap_or_else(|_| {
                tracing::warn!("{BIND_ADDR_ENV}={raw} is not a socket address; using {DEFAULT_BIND_ADDR}");
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let seed_demo = lookup(SEED_DEMO_ENV)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.seed_demo);

        Self {
            bind_addr,
            seed_demo,
        }
    }
}
