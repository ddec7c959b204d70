//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of entries the cache can hold
    pub cache_capacity: usize,
    /// Directory for stored document payloads
    pub files_dir: String,
    /// Admin token authorizing user registration; empty disables it
    pub admin_token: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 100)
    /// - `FILES_DIR` - Payload directory (default: ./files)
    /// - `ADMIN_TOKEN` - Registration token (default: empty, registration disabled)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            files_dir: env::var("FILES_DIR").unwrap_or_else(|_| "./files".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_capacity: 100,
            files_dir: "./files".to_string(),
            admin_token: String::new(),
        }
    }
}
