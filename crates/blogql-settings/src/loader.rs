//! Settings loading: compiled defaults, then the settings file merged over
//! them, then `BLOGQL_*` environment overrides, then validation.
//!
//! Loading can run before logging is set up, so env values that fail to
//! parse are returned in [`LoadedSettings::rejected`] instead of being
//! logged on the spot. Call [`LoadedSettings::warn_rejected`] once a
//! subscriber is installed.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::{BlogqlSettings, MAX_EVENT_CAPACITY};

/// Env var naming an alternative settings file.
pub const CONFIG_ENV: &str = "BLOGQL_CONFIG";

/// An env override that was ignored because its value did not parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedOverride {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug)]
pub struct LoadedSettings {
    pub settings: BlogqlSettings,
    pub rejected: Vec<RejectedOverride>,
}

impl LoadedSettings {
    pub fn warn_rejected(&self) {
        for r in &self.rejected {
            warn!(key = r.key, value = %r.value, "invalid env var, ignoring");
        }
    }
}

/// Resolve the settings file: `$BLOGQL_CONFIG`, else `~/.blogql/settings.json`.
pub fn settings_path() -> PathBuf {
    if let Some(path) = read_env_string(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".blogql").join("settings.json")
}

/// Load settings from `path` with process env overrides applied.
///
/// A missing file yields defaults; a malformed one is an error.
pub fn load_settings_from_path(path: &Path) -> Result<LoadedSettings> {
    let mut settings = read_settings_file(path)?;
    let rejected = apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(LoadedSettings { settings, rejected })
}

/// Defaults merged with the file at `path`, without env overrides.
pub fn read_settings_file(path: &Path) -> Result<BlogqlSettings> {
    let parse_error = |source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut merged = serde_json::to_value(BlogqlSettings::default()).map_err(parse_error)?;
    if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let overlay: Value = serde_json::from_str(&content).map_err(parse_error)?;
        merge_json(&mut merged, overlay);
    } else {
        debug!(?path, "settings file not found, using defaults");
    }

    serde_json::from_value(merged).map_err(parse_error)
}

/// Overlay `source` onto `target` in place.
///
/// Objects merge key by key, `null` in `source` keeps what `target` has, and
/// any other value replaces the target outright.
pub fn merge_json(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(into), Value::Object(from)) => {
            for (key, value) in from.into_iter().filter(|(_, v)| !v.is_null()) {
                match into.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        into.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Apply process environment overrides, returning the ones that were ignored.
pub fn apply_env_overrides(settings: &mut BlogqlSettings) -> Vec<RejectedOverride> {
    apply_overrides(settings, read_env_string)
}

/// Apply `BLOGQL_*` overrides using `lookup` to resolve variable names.
///
/// Values that fail to parse leave the file/default value in place and are
/// returned to the caller.
pub fn apply_overrides<F>(settings: &mut BlogqlSettings, lookup: F) -> Vec<RejectedOverride>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env = Overrides {
        lookup,
        rejected: Vec::new(),
    };

    if let Some(v) = env.raw("BLOGQL_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = env.parsed("BLOGQL_PORT", |s| parse_u16_range(s, 1, 65535)) {
        settings.server.port = v;
    }
    if let Some(v) = env.parsed("BLOGQL_EVENT_CAPACITY", |s| {
        parse_usize_range(s, 1, MAX_EVENT_CAPACITY)
    }) {
        settings.server.event_capacity = v;
    }
    if let Some(v) = env.raw("BLOGQL_LOG_LEVEL") {
        settings.logging.level = v.to_lowercase();
    }
    if let Some(v) = env.parsed("BLOGQL_LOG_JSON", parse_bool) {
        settings.logging.json = v;
    }
    if let Some(v) = env.parsed("BLOGQL_SEED", parse_bool) {
        settings.store.seed = v;
    }

    env.rejected
}

struct Overrides<F> {
    lookup: F,
    rejected: Vec<RejectedOverride>,
}

impl<F: Fn(&str) -> Option<String>> Overrides<F> {
    fn raw(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
    }

    fn parsed<T>(&mut self, key: &'static str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let value = (self.lookup)(key)?;
        let parsed = parse(&value);
        if parsed.is_none() {
            self.rejected.push(RejectedOverride { key, value });
        }
        parsed
    }
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (min..=max).contains(&n).then_some(n)
}

pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (min..=max).contains(&n).then_some(n)
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
