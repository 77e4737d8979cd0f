//! Extractor registry and extraction dispatch
//!
//! The registry is a strategy table: each [`FormatFlag`] maps to exactly
//! one [`Extractor`]. Dispatch tries the acceptable formats for a file in
//! canonical order and stops at the first one that yields fields.
//!
//! # Error isolation
//! A candidate that rejects the file (malformed input, read failure) is
//! logged and skipped. Dispatch itself never fails.

use crate::types::{is_falsy, ExtractError, Extractor, FieldMap, FormatFlag};
use filemeta_common::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Format flag → extractor table
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: BTreeMap<FormatFlag, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the extractor for one format
    ///
    /// Replaces any extractor previously registered for `flag`.
    ///
    /// # Errors
    /// `Error::InvalidInput` if `flag` is empty or combines several formats.
    pub fn register(&mut self, flag: FormatFlag, extractor: Arc<dyn Extractor>) -> Result<()> {
        if !flag.is_single() {
            return Err(Error::InvalidInput(format!(
                "Extractor must be registered for exactly one format, got {}",
                flag
            )));
        }

        if let Some(previous) = self.extractors.insert(flag, extractor) {
            debug!(flag = %flag, previous = previous.name(), "Replaced registered extractor");
        }
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, flag: FormatFlag, extractor: Arc<dyn Extractor>) -> Result<Self> {
        self.register(flag, extractor)?;
        Ok(self)
    }

    /// Extractor registered for `flag`
    pub fn get(&self, flag: FormatFlag) -> Option<&Arc<dyn Extractor>> {
        self.extractors.get(&flag)
    }

    /// Number of registered formats
    pub fn count(&self) -> usize {
        self.extractors.len()
    }

    /// Extract fields from `path`, trying acceptable formats in priority order
    ///
    /// **Algorithm:**
    /// 1. For each format in canonical order that is in `flags`
    /// 2. Parse the file; malformed input or read failure → next format
    /// 3. Empty parse result → next format
    /// 4. Derive fields; non-empty → return immediately
    ///
    /// Returns an empty map if no format produced fields.
    pub fn dispatch(&self, flags: FormatFlag, path: &Path) -> FieldMap {
        for flag in FormatFlag::canonical_order().filter(|f| flags.contains(*f)) {
            info!(flag = %flag, path = %path.display(), "Attempting with {}", flag);

            let Some(extractor) = self.get(flag) else {
                debug!(flag = %flag, "No extractor registered");
                continue;
            };

            let raw = match extractor.file_to_raw(path) {
                Ok(raw) => raw,
                Err(ExtractError::MalformedInput { reason, .. }) => {
                    info!(flag = %flag, reason = %reason, "Skipping {}", flag);
                    continue;
                }
                Err(ExtractError::Io(e)) => {
                    warn!(
                        flag = %flag,
                        path = %path.display(),
                        error = %e,
                        "Skipping {} (read failed)",
                        flag
                    );
                    continue;
                }
            };

            match raw {
                Some(raw) if !is_falsy(&raw) => {
                    info!(flag = %flag, extractor = extractor.name(), "{} matched!", flag);
                    let fields = extractor.raw_to_fields(&raw);
                    if !fields.is_empty() {
                        debug!(flag = %flag, keys = fields.len(), "Fields extracted");
                        return fields;
                    }
                    debug!(flag = %flag, "Matched but produced no fields");
                }
                _ => {
                    info!(flag = %flag, "{} didn't match", flag);
                }
            }
        }

        FieldMap::new()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.extractors.iter().map(|(flag, ex)| (flag.to_string(), ex.name())))
            .finish()
    }
}

// ============================================================================
// Mock Extractor for Testing
// ============================================================================


// ============================================================================
// Tests
// ============================================================================
