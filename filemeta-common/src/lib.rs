//! # filemeta common library
//!
//! Shared code for the companion-file metadata crates:
//! - Error and result types
//! - Configuration file resolution and loading
//! - Merging of JSON configuration updates into typed config structs

pub mod config;
pub mod error;

pub use error::{Error, Result};
