//! Companion-file listing
//!
//! The host decides where a gallery's files live. [`ContentSource`] is the
//! listing seam; [`DirectoryContents`] covers galleries stored as plain
//! directories.

use filemeta_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Lists the files belonging to a gallery
pub trait ContentSource {
    /// Files of the gallery at `path`, in a stable order
    fn contents(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Listed file with its lowercase file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionFile {
    pub path: PathBuf,
    /// Lowercase file name (no directory part)
    pub name: String,
}

impl CompanionFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self { path, name }
    }
}

/// Keep files whose name passes `recognized`, preserving listing order
pub fn companion_files<F>(paths: Vec<PathBuf>, recognized: F) -> Vec<CompanionFile>
where
    F: Fn(&str) -> bool,
{
    paths
        .into_iter()
        .map(CompanionFile::new)
        .filter(|file| recognized(&file.name))
        .collect()
}

/// Directory-backed galleries
///
/// Lists regular files directly inside the gallery directory, sorted by
/// file name. Anything that is not a directory (e.g. an archive) has no
/// listable contents.
#[derive(Debug, Clone, Default)]
pub struct DirectoryContents;

impl DirectoryContents {
    pub fn new() -> Self {
        Self
    }
}

impl ContentSource for DirectoryContents {
    fn contents(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            return Err(Error::InvalidInput(format!(
                "Path not found: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            debug!(path = %path.display(), "Not a directory, no contents listed");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    warn!("Error accessing entry: {}", e);
                    // Continue listing, don't abort
                }
            }
        }

        Ok(files)
    }
}
