//! Plugin configuration
//!
//! The live configuration is an immutable [`PluginConfig`] held by a
//! [`ConfigHandle`]. Loading and updates build a new config, validate it and
//! swap it in; readers work on a snapshot taken at the start of an
//! operation. Last writer wins.

use crate::models::CommitOptions;
use crate::rules::FilenameRules;
use filemeta_common::config::{load_toml_config, merge_json_update, resolve_config_path, CONFIG_ENV_VAR};
use filemeta_common::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// One filename rule as written in the config file
///
/// ```toml
/// [[rules]]
/// filenames = ["info.json"]
/// formats = ["EZE", "HDOUJIN"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub filenames: Vec<String>,
    pub formats: Vec<String>,
}

/// Plugin settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Capitalize artist, circle and parody names
    pub capitalize_names: bool,

    /// Recognized companion-file extensions (case-insensitive suffixes)
    pub filetypes: Vec<String>,

    /// Replacement filename rule table; built-in table when unset
    pub rules: Option<Vec<RuleConfig>>,

    /// Merge options passed to the store when committing parsed metadata
    pub commit_options: CommitOptions,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            capitalize_names: true,
            filetypes: vec![".json".to_string(), ".txt".to_string()],
            rules: None,
            commit_options: CommitOptions::default(),
        }
    }
}

impl PluginConfig {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if let Some(rules) = &self.rules {
            FilenameRules::from_config(rules)?;
        }
        Ok(())
    }

    /// True if `file_name` ends with a recognized extension
    pub fn is_recognized(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.filetypes
            .iter()
            .any(|ext| lower.ends_with(&ext.to_lowercase()))
    }

    /// Filename rules from config, or `fallback` when none are configured
    pub fn filename_rules(&self, fallback: &FilenameRules) -> Result<FilenameRules> {
        match &self.rules {
            Some(rules) => FilenameRules::from_config(rules),
            None => Ok(fallback.clone()),
        }
    }
}

/// Shared, swappable plugin configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle {
    inner: Arc<RwLock<Arc<PluginConfig>>>,
}

impl ConfigHandle {
    pub fn new(config: PluginConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Current configuration
    pub fn snapshot(&self) -> Arc<PluginConfig> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate and install a new configuration
    pub fn replace(&self, config: PluginConfig) -> Result<()> {
        config.validate()?;
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
        Ok(())
    }

    /// Load configuration from file
    ///
    /// Path priority: `path` argument → `FILEMETA_CONFIG` → platform config
    /// dir. A missing file installs the defaults.
    pub fn load(&self, path: Option<&Path>) -> Result<()> {
        let resolved = resolve_config_path(path, CONFIG_ENV_VAR);
        let config: PluginConfig = load_toml_config(resolved.as_deref())?;
        self.replace(config)
    }

    /// Merge updated keys into the live configuration
    ///
    /// On error the live configuration is left untouched.
    pub fn apply_update(&self, update: &serde_json::Value) -> Result<()> {
        let current = self.snapshot();
        let updated: PluginConfig = merge_json_update(current.as_ref(), update)?;
        self.replace(updated)?;
        info!("Plugin configuration updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filemeta_common::Error;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = PluginConfig::default();
        assert!(config.capitalize_names);
        assert!(config.rules.is_none());
        assert!(config.is_recognized("INFO.TXT"));
        assert!(config.is_recognized("info.json"));
        assert!(!config.is_recognized("cover.jpg"));
    }

    #[test]
    fn test_update_merges_keys() {
        let handle = ConfigHandle::default();
        handle
            .apply_update(&json!({"capitalize_names": false}))
            .unwrap();

        let config = handle.snapshot();
        assert!(!config.capitalize_names);
        assert_eq!(config.filetypes, PluginConfig::default().filetypes);
    }

    #[test]
    fn test_snapshot_unaffected_by_later_update() {
        let handle = ConfigHandle::default();
        let before = handle.snapshot();
        handle.apply_update(&json!({"filetypes": [".xml"]})).unwrap();

        assert_eq!(before.filetypes, vec![".json".to_string(), ".txt".to_string()]);
        assert_eq!(handle.snapshot().filetypes, vec![".xml".to_string()]);
    }

    #[test]
    fn test_invalid_update_leaves_config() {
        let handle = ConfigHandle::default();
        let result = handle.apply_update(&json!({"capitalize_names": "no"}));
        assert!(matches!(result, Err(Error::Config(_))));
        assert_eq!(*handle.snapshot(), PluginConfig::default());
    }

    #[test]
    fn test_unknown_format_in_rules_rejected() {
        let handle = ConfigHandle::default();
        let result = handle.apply_update(&json!({
            "rules": [{"filenames": ["info.json"], "formats": ["NOPE"]}]
        }));
        assert!(matches!(result, Err(Error::Config(_))));
        assert!(handle.snapshot().rules.is_none());
    }

    #[test]
    fn test_commit_options_update() {
        let handle = ConfigHandle::default();
        handle
            .apply_update(&json!({"commit_options": {"replace_tags": true}}))
            .unwrap();
        assert_eq!(
            handle.snapshot().commit_options.get("replace_tags"),
            Some(&json!(true))
        );
    }
}
