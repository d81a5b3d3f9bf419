use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_LANGUAGE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Behaviour of the greeting resource itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Language used when the caller states no usable preference.
    pub default_language: String,
    /// `max-age` for single greetings, in seconds.
    pub item_max_age: u32,
    /// `max-age` for the greetings collection, in seconds.
    pub list_max_age: u32,
    /// Fixed Last-Modified reported for single greetings, epoch milliseconds.
    pub last_modified_epoch_ms: i64,
    pub load_seed_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            item_max_age: 60,
            list_max_age: 30,
            last_modified_epoch_ms: 1_505_500_000_000,
            load_seed_data: true,
        }
    }
}

impl ServiceConfig {
    pub fn last_modified(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.last_modified_epoch_ms)
            .single()
            .unwrap_or_default()
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional config file and the environment
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        config = config.add_source(config::File::with_name("config").required(false));

        // e.g. GREETING_SERVER__PORT=9000, GREETING_SERVICE__DEFAULT_LANGUAGE=en
        config = config.add_source(
            config::Environment::with_prefix("GREETING")
                .separator("__")
                .prefix_separator("_"),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
