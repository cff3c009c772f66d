use std::env;

use crate::placeholder::DEFAULT_PLACEHOLDER_SIZE;

pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000";
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.nasa.gov";
/// NASA's shared, rate-limited demo key.
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";

/// Endpoints and credentials for the imagery pipeline.
///
/// Read from the environment once at startup; CLI flags may override fields
/// afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageryConfig {
    pub proxy_url: String,
    pub upstream_url: String,
    pub api_key: String,
    pub placeholder_size: u32,
}

impl Default for ImageryConfig {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            placeholder_size: DEFAULT_PLACEHOLDER_SIZE,
        }
    }
}

impl ImageryConfig {
    pub fn from_env() -> Self {
        Self {
            proxy_url: env::var("EARTHPULSE_PROXY_URL")
                .unwrap_or_else(|_| DEFAULT_PROXY_URL.to_string()),
            upstream_url: env::var("EPIC_UPSTREAM_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string()),
            api_key: env::var("NASA_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string()),
            placeholder_size: env_var_u32("EARTHPULSE_PLACEHOLDER_SIZE", DEFAULT_PLACEHOLDER_SIZE),
        }
    }
}

pub fn env_var_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}
