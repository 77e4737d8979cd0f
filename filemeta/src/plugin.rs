//! File metadata plugin
//!
//! Wires the pieces together for the host:
//! - `on_init` / `on_config_update` lifecycle hooks
//! - `parse_metadata_file`: companion files → filename rules → dispatch →
//!   accumulate → normalize → commit
//!
//! # Field accumulation
//! Fields from every rule that produced data are merged by key into one
//! map. A key produced by a later rule replaces the value from an earlier
//! rule. Rules whose file yields nothing leave the map untouched.

use crate::config::{ConfigHandle, PluginConfig};
use crate::contents::{companion_files, ContentSource};
use crate::extractors::ExtractorRegistry;
use crate::models::{CommitOptions, GalleryData};
use crate::normalize::Normalizer;
use crate::rules::FilenameRules;
use crate::types::FieldMap;
use filemeta_common::Result;
use std::path::Path;
use tracing::{debug, info};

/// Host store that receives normalized metadata
///
/// How new values combine with what the store already holds for the target
/// is up to the store and `options`.
pub trait ItemStore {
    /// Item the metadata is written onto
    type Target: ?Sized;

    /// Write `data` onto `target`; returns whether anything was applied
    fn update_item_data(
        &self,
        target: &Self::Target,
        data: GalleryData,
        options: &CommitOptions,
    ) -> Result<bool>;
}

/// Companion-file metadata plugin
pub struct FileMetadataPlugin<C, S> {
    config: ConfigHandle,
    rules: FilenameRules,
    registry: ExtractorRegistry,
    contents: C,
    store: S,
}

impl<C, S> FileMetadataPlugin<C, S>
where
    C: ContentSource,
    S: ItemStore,
{
    /// Create a plugin with default configuration and the built-in rules
    pub fn new(registry: ExtractorRegistry, contents: C, store: S) -> Self {
        Self {
            config: ConfigHandle::default(),
            rules: FilenameRules::default(),
            registry,
            contents,
            store,
        }
    }

    /// Replace the built-in filename rules
    ///
    /// Rules set in the configuration still take precedence.
    pub fn with_rules(mut self, rules: FilenameRules) -> Self {
        self.rules = rules;
        self
    }

    /// Share an existing configuration handle
    pub fn with_config(mut self, config: ConfigHandle) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load plugin configuration
    pub fn on_init(&self, config_path: Option<&Path>) -> Result<()> {
        self.config.load(config_path)
    }

    /// Merge a configuration update into the live configuration
    pub fn on_config_update(&self, update: &serde_json::Value) -> Result<()> {
        self.config.apply_update(update)
    }

    /// Extract metadata from the companion files of `path` and commit it
    ///
    /// Returns `true` if at least one rule produced fields (and a commit was
    /// made), `false` if nothing matched. Errors come only from the listing
    /// and store collaborators.
    pub fn parse_metadata_file(&self, path: &Path, target: &S::Target) -> Result<bool> {
        let config = self.config.snapshot();

        let Some(fields) = self.collect_fields(path, &config)? else {
            debug!(path = %path.display(), "No companion metadata found");
            return Ok(false);
        };

        self.commit(&fields, target, &config.commit_options, &config)?;
        Ok(true)
    }

    /// Run the filename rules over the companion files of `path`
    ///
    /// Returns the accumulated fields, or `None` if no rule produced any.
    pub fn extract_fields(&self, path: &Path) -> Result<Option<FieldMap>> {
        let config = self.config.snapshot();
        self.collect_fields(path, &config)
    }

    /// Normalize `fields` and commit them onto `target` with `options`
    pub fn apply_metadata(
        &self,
        fields: &FieldMap,
        target: &S::Target,
        options: &CommitOptions,
    ) -> Result<bool> {
        let config = self.config.snapshot();
        self.commit(fields, target, options, &config)
    }

    fn collect_fields(&self, path: &Path, config: &PluginConfig) -> Result<Option<FieldMap>> {
        let rules = config.filename_rules(&self.rules)?;
        let files = companion_files(self.contents.contents(path)?, |name| {
            config.is_recognized(name)
        });

        debug!(
            path = %path.display(),
            files = ?files.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            "Companion files"
        );

        let mut accumulated = FieldMap::new();
        let mut applied = false;

        for rule in rules.iter() {
            let Some(file) = rule.first_match(&files) else {
                continue;
            };

            debug!(path = %file.path.display(), flags = %rule.flags(), "Rule matched file");
            let fields = self.registry.dispatch(rule.flags(), &file.path);
            if !fields.is_empty() {
                applied = true;
                accumulated.extend(fields);
            }
        }

        Ok(applied.then_some(accumulated))
    }

    fn commit(
        &self,
        fields: &FieldMap,
        target: &S::Target,
        options: &CommitOptions,
        config: &PluginConfig,
    ) -> Result<bool> {
        debug!(keys = ?fields.keys().collect::<Vec<_>>(), "Normalizing fields");

        let data = Normalizer::new(config).normalize_map(fields);
        let fields_applied = data.applied_fields();
        let applied = self.store.update_item_data(target, data, options)?;

        info!(fields = ?fields_applied, applied = applied, "Metadata committed");
        Ok(applied)
    }
}
