//! Test Helper Utilities
//!
//! Shared fixtures for filemeta integration tests: simple format
//! extractors, a recording store and gallery directory builders.

#![allow(dead_code)]

pub mod log_capture;

pub use log_capture::capture_logs;

use filemeta::{
    CommitOptions, ExtractError, Extractor, FieldMap, GalleryData, ItemStore, RawDocument,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// JSON extractor reading the object stored under `root_key`
///
/// Not JSON → malformed input. JSON without `root_key` → no match.
pub struct JsonRootExtractor {
    pub root_key: &'static str,
    pub calls: Arc<AtomicUsize>,
}

impl JsonRootExtractor {
    pub fn new(root_key: &'static str) -> Self {
        Self {
            root_key,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Extractor for JsonRootExtractor {
    fn name(&self) -> &'static str {
        "json-root"
    }

    fn file_to_raw(&self, path: &Path) -> Result<Option<RawDocument>, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = std::fs::read_to_string(path)?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| ExtractError::malformed(path, e.to_string()))?;
        Ok(value.get(self.root_key).cloned())
    }

    fn raw_to_fields(&self, raw: &RawDocument) -> FieldMap {
        raw.as_object().cloned().unwrap_or_default()
    }
}

/// `Key: value` text extractor
///
/// Recognizes `Title`, `Category`, `Language` and `Tags` (comma separated).
/// A file with no `Key: value` line is malformed input.
pub struct KeyValueTextExtractor {
    pub calls: Arc<AtomicUsize>,
}

impl KeyValueTextExtractor {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Extractor for KeyValueTextExtractor {
    fn name(&self) -> &'static str {
        "key-value"
    }

    fn file_to_raw(&self, path: &Path) -> Result<Option<RawDocument>, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = std::fs::read_to_string(path)?;
        let mut raw = serde_json::Map::new();
        for line in text.lines() {
            if let Some((key, value)) = line.split_once(':') {
                raw.insert(
                    key.trim().to_lowercase(),
                    serde_json::Value::String(value.trim().to_string()),
                );
            }
        }
        if raw.is_empty() {
            return Err(ExtractError::malformed(path, "no key: value lines"));
        }
        Ok(Some(serde_json::Value::Object(raw)))
    }

    fn raw_to_fields(&self, raw: &RawDocument) -> FieldMap {
        let mut fields = FieldMap::new();
        let text = |key: &str| raw.get(key).and_then(|v| v.as_str()).map(str::to_string);

        if let Some(title) = text("title") {
            fields.insert("titles".to_string(), serde_json::json!([[title, null]]));
        }
        if let Some(category) = text("category") {
            fields.insert("category".to_string(), category.into());
        }
        if let Some(language) = text("language") {
            fields.insert("language".to_string(), language.into());
        }
        if let Some(tags) = text("tags") {
            let tags: Vec<&str> = tags.split(',').collect();
            fields.insert("tags".to_string(), serde_json::json!(tags));
        }
        fields
    }
}

/// Store recording every commit
#[derive(Default)]
pub struct RecordingStore {
    pub commits: Mutex<Vec<(String, GalleryData, CommitOptions)>>,
}

impl RecordingStore {
    pub fn commit_count(&self) -> usize {
        self.commits.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<(String, GalleryData, CommitOptions)> {
        self.commits.lock().unwrap().last().cloned()
    }
}

impl ItemStore for RecordingStore {
    type Target = str;

    fn update_item_data(
        &self,
        target: &str,
        data: GalleryData,
        options: &CommitOptions,
    ) -> filemeta::Result<bool> {
        let applied = !data.is_empty();
        self.commits
            .lock()
            .unwrap()
            .push((target.to_string(), data, options.clone()));
        Ok(applied)
    }
}

/// Gallery directory containing the given files
pub fn gallery_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}
