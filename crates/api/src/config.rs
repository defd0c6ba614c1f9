//! Runtime configuration, read from the environment.

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:3001";
pub const DEFAULT_DASHBOARD_URL: &str = "http://localhost:5173/dashboard";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: invalid socket address {value:?}")]
    InvalidAddress { key: &'static str, value: String },

    #[error("{key}: expected true/false, got {value:?}")]
    InvalidFlag { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// `DETAILPRO_BIND`
    pub bind_addr: SocketAddr,
    /// `DETAILPRO_SEED`: start with the shop's catalog instead of an empty store.
    pub seed_catalog: bool,
    /// `DETAILPRO_DASHBOARD_URL`: where the OAuth mock endpoints redirect.
    pub dashboard_url: String,
    /// `DETAILPRO_ADMIN_USER`
    pub admin_user: String,
    /// `DETAILPRO_ADMIN_PASSWORD`
    pub admin_password: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            seed_catalog: true,
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            admin_user: "admin".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("DETAILPRO_BIND") {
            config.bind_addr = value.trim().parse().map_err(|_| ConfigError::InvalidAddress {
                key: "DETAILPRO_BIND",
                value,
            })?;
        }

        if let Some(value) = lookup("DETAILPRO_SEED") {
            config.seed_catalog = parse_flag("DETAILPRO_SEED", value)?;
        }

        if let Some(value) = lookup("DETAILPRO_DASHBOARD_URL") {
            config.dashboard_url = value;
        }

        if let Some(value) = lookup("DETAILPRO_ADMIN_USER") {
            config.admin_user = value;
        }

        match lookup("DETAILPRO_ADMIN_PASSWORD") {
            Some(value) => config.admin_password = value,
            None => tracing::warn!("DETAILPRO_ADMIN_PASSWORD not set; using insecure dev default"),
        }

        Ok(config)
    }
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value }),
    }
}
