//! Configuration file resolution, loading and live updates
//!
//! Config file resolution follows a fixed priority order:
//! 1. Explicit path argument (highest priority)
//! 2. Environment variable
//! 3. Platform config directory (`<config dir>/filemeta/config.toml`)
//!
//! A missing config file is never fatal: a warning is logged and compiled
//! defaults are used. A file that exists but cannot be read or parsed is a
//! configuration error.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "FILEMETA_CONFIG";

/// Application directory name under the platform config directory
pub const APP_DIR_NAME: &str = "filemeta";

/// Config file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolve the config file path
///
/// Returns `None` only when no explicit path is given and the platform has
/// no config directory.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: explicit argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: platform default
    default_config_path()
}

/// Platform default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load a TOML config file into `T`
///
/// Missing path or missing file: warn and return `T::default()`.
pub fn load_toml_config<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        warn!("No config directory available, using default configuration");
        return Ok(T::default());
    };

    if !path.exists() {
        warn!(
            path = %path.display(),
            "Config file not found, using default configuration"
        );
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Merge a JSON object of updated keys into a config value
///
/// Keys present in `update` replace the current values; keys missing from
/// `update` keep their current values. Keys the config does not know about
/// are ignored. The result is fully re-validated by deserializing into `T`,
/// so an invalid value yields an error and `current` is left as is.
pub fn merge_json_update<T>(current: &T, update: &serde_json::Value) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let serde_json::Value::Object(changes) = update else {
        return Err(Error::InvalidInput(format!(
            "Config update must be an object, got {}",
            json_kind(update)
        )));
    };

    let mut merged = serde_json::to_value(current)?;
    let serde_json::Value::Object(fields) = &mut merged else {
        return Err(Error::Internal(
            "Config does not serialize to an object".to_string(),
        ));
    };

    for (key, value) in changes {
        if fields.contains_key(key) {
            fields.insert(key.clone(), value.clone());
        } else {
            debug!(key = %key, "Ignoring unknown config key");
        }
    }

    serde_json::from_value(merged)
        .map_err(|e| Error::Config(format!("Invalid config update: {}", e)))
}

/// Short name of a JSON value's kind, for diagnostics
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
