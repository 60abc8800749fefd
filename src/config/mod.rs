// Configuration module entry point
// Loads typed configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, DemoConfig, EtagBucket};

/// Environment variable naming an alternative config file (without extension)
const CONFIG_PATH_ENV: &str = "CACHELAB_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from `config.toml` (or `$CACHELAB_CONFIG`),
    /// `CACHELAB__*` environment variables and the `PORT` variable
    pub fn load() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let port = std::env::var("PORT").ok().filter(|p| !p.trim().is_empty());
        Self::load_from(&path, port)
    }

    /// Load configuration from the given file path, with an optional listen
    /// port that takes precedence over every other source
    pub fn load_from(config_path: &str, port: Option<String>) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("CACHELAB").separator("__"))
            .set_override_option("server.port", port)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
