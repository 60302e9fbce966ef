//! # blogql-settings
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`BlogqlSettings::default()`]
//! 2. **Settings file**: `~/.blogql/settings.json` or `$BLOGQL_CONFIG`,
//!    deep-merged over defaults
//! 3. **Environment variables**: `BLOGQL_*` overrides (highest priority)
//!
//! ```no_run
//! let path = blogql_settings::settings_path();
//! let loaded = blogql_settings::load_settings_from_path(&path).unwrap();
//! let server = &loaded.settings.server;
//! println!("listening on {}:{}", server.host, server.port);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_overrides, load_settings_from_path, merge_json, settings_path,
    LoadedSettings, RejectedOverride,
};
pub use types::*;
