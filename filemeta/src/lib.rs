//! filemeta library interface
//!
//! Extracts gallery metadata from companion files (e.g. `info.json`,
//! `info.txt`) and turns it into a normalized [`GalleryData`] record for the
//! host store.
//!
//! # Pipeline
//! companion-file listing → filename rules → extraction dispatch →
//! field accumulation → normalization → commit
//!
//! Format parsers are not part of this crate. Hosts register one
//! [`Extractor`] per [`FormatFlag`] in an [`ExtractorRegistry`].

pub mod config;
pub mod contents;
pub mod extractors;
pub mod models;
pub mod normalize;
pub mod plugin;
pub mod raw_fields;
pub mod rules;
pub mod types;

pub use crate::config::{ConfigHandle, PluginConfig};
pub use crate::contents::{ContentSource, DirectoryContents};
pub use crate::extractors::ExtractorRegistry;
pub use crate::models::{CommitOptions, GalleryData};
pub use crate::plugin::{FileMetadataPlugin, ItemStore};
pub use crate::rules::{FilenameRule, FilenameRules};
pub use crate::types::{ExtractError, Extractor, FieldMap, FormatFlag, RawDocument};

pub use filemeta_common::{Error, Result};
