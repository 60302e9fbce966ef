//! Settings type definitions.
//!
//! Field names are camelCase in JSON. Every section is `#[serde(default)]`,
//! so a settings file only needs the values it changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Log levels accepted by `logging.level` and the per-module overrides.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Upper bound for `server.eventCapacity`; the broadcast ring buffer is
/// allocated up front at this size.
pub const MAX_EVENT_CAPACITY: usize = 65536;

/// Root settings type.
///
/// ```json
/// {
///   "server": { "port": 4001 },
///   "logging": { "level": "debug", "modules": { "blogql_store": "trace" } }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogqlSettings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub store: StoreSettings,
}

impl BlogqlSettings {
    /// Reject values the server cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(SettingsError::invalid("server.host", "must not be empty"));
        }
        if !(1..=MAX_EVENT_CAPACITY).contains(&self.server.event_capacity) {
            return Err(SettingsError::invalid(
                "server.eventCapacity",
                format!(
                    "{} is not between 1 and {MAX_EVENT_CAPACITY}",
                    self.server.event_capacity
                ),
            ));
        }
        if !is_log_level(&self.logging.level) {
            return Err(SettingsError::invalid(
                "logging.level",
                format!("{:?} is not one of {}", self.logging.level, LOG_LEVELS.join(", ")),
            ));
        }
        if let Some((module, level)) = self.logging.modules.iter().find(|(_, l)| !is_log_level(l)) {
            return Err(SettingsError::invalid(
                format!("logging.modules.{module}"),
                format!("unknown level {level:?}"),
            ));
        }
        Ok(())
    }
}

/// HTTP listener and event bus settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Listen port. `0` picks a free port.
    pub port: u16,
    /// Capacity of the subscription broadcast channel.
    pub event_capacity: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            event_capacity: 1024,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default level. `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Per-module level overrides, e.g. `"blogql_store": "debug"`.
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            modules: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    /// Load the demo users, posts and comments on startup.
    pub seed: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { seed: true }
    }
}

fn is_log_level(level: &str) -> bool {
    LOG_LEVELS.contains(&level.to_lowercase().as_str())
}
