//! Core types and the extractor capability
//!
//! Defines the format flags, the untyped field map produced by extractors,
//! and the [`Extractor`] trait hosts implement once per supported format.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

bitflags! {
    /// Supported companion-file formats
    ///
    /// Declaration order is the canonical priority order used by the
    /// dispatcher when several formats are acceptable for one file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct FormatFlag: u32 {
        /// eze `info.json`
        const EZE = 1 << 0;

        /// HDoujin downloader `info.txt` / `info.json`
        const HDOUJIN = 1 << 1;

        /// e-hentai-downloader `info.txt`
        const EHDOWNLOADER = 1 << 2;
    }
}

impl FormatFlag {
    /// Single flags in canonical priority order
    pub fn canonical_order() -> impl Iterator<Item = FormatFlag> {
        FormatFlag::all().iter()
    }

    /// True if exactly one format bit is set
    pub fn is_single(&self) -> bool {
        self.bits().count_ones() == 1
    }

    /// Parse a list of flag names (`"EZE"`, `"hdoujin"`, ...) into a set
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Option<FormatFlag> {
        names.iter().try_fold(FormatFlag::empty(), |acc, name| {
            let name = name.as_ref().trim().to_ascii_uppercase();
            FormatFlag::from_name(&name).map(|flag| acc | flag)
        })
    }
}

impl fmt::Display for FormatFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        if names.is_empty() {
            f.write_str("NONE")
        } else {
            f.write_str(&names.join(" | "))
        }
    }
}

/// Raw structure parsed from a companion file, before field derivation
pub type RawDocument = serde_json::Value;

/// Semantic field dictionary produced by an extractor
///
/// Recognized keys: `titles`, `artists`, `parodies`, `category`,
/// `language`, `tags`, `pub_date`, `urls`. Unknown keys are carried along
/// and ignored by normalization.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// Extraction error
#[derive(Debug, Error)]
pub enum ExtractError {
    /// File content is not in the format this extractor understands
    #[error("Malformed input {path}: {reason}")]
    MalformedInput {
        /// Offending file
        path: PathBuf,
        /// What did not match
        reason: String,
    },

    /// I/O error (file read)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Shorthand for a malformed-input rejection
    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        ExtractError::MalformedInput {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Companion-file format extractor
///
/// One implementation per [`FormatFlag`], registered in an
/// [`ExtractorRegistry`](crate::extractors::ExtractorRegistry).
///
/// # Example
/// ```rust,ignore
/// use filemeta::{Extractor, ExtractError, FieldMap, RawDocument};
///
/// struct EzeExtractor;
///
/// impl Extractor for EzeExtractor {
///     fn name(&self) -> &'static str { "eze" }
///
///     fn file_to_raw(&self, path: &Path) -> Result<Option<RawDocument>, ExtractError> {
///         let text = std::fs::read_to_string(path)?;
///         serde_json::from_str(&text)
///             .map(Some)
///             .map_err(|e| ExtractError::malformed(path, e.to_string()))
///     }
///
///     fn raw_to_fields(&self, raw: &RawDocument) -> FieldMap {
///         // map eze keys onto titles/artists/tags/...
///         FieldMap::new()
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// Extractor name for logging
    fn name(&self) -> &'static str;

    /// Parse a file into a raw structure
    ///
    /// `Ok(None)` (or an empty document) means the file did not match.
    ///
    /// # Errors
    /// `ExtractError::MalformedInput` when the content is unreadable or not
    /// in this extractor's format.
    fn file_to_raw(&self, path: &Path) -> Result<Option<RawDocument>, ExtractError>;

    /// Derive the semantic field dictionary from a raw structure
    fn raw_to_fields(&self, raw: &RawDocument) -> FieldMap;
}

/// Truthiness of a loosely-typed value
///
/// Null, `false`, zero, empty strings and empty containers are falsy.
pub fn is_falsy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(a) => a.is_empty(),
        serde_json::Value::Object(o) => o.is_empty(),
    }
}
