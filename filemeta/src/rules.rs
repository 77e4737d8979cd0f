//! Filename rule table
//!
//! Rules map companion-file names to the formats that may describe them.
//! They are tried in declaration order and each rule inspects at most one
//! file: the first listed companion file whose lowercase name it accepts.

use crate::config::RuleConfig;
use crate::contents::CompanionFile;
use crate::types::FormatFlag;
use filemeta_common::{Error, Result};
use std::collections::BTreeSet;

/// Accepted file names and the formats to try for them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameRule {
    filenames: BTreeSet<String>,
    flags: FormatFlag,
}

impl FilenameRule {
    /// Create a rule; file names are stored lowercased
    pub fn new<I, S>(filenames: I, flags: FormatFlag) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            filenames: filenames
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .collect(),
            flags,
        }
    }

    pub fn flags(&self) -> FormatFlag {
        self.flags
    }

    pub fn filenames(&self) -> &BTreeSet<String> {
        &self.filenames
    }

    /// True if `name` (already lowercased) is one of the rule's file names
    pub fn accepts(&self, name: &str) -> bool {
        self.filenames.contains(name)
    }

    /// First companion file this rule accepts
    pub fn first_match<'a>(&self, files: &'a [CompanionFile]) -> Option<&'a CompanionFile> {
        files.iter().find(|file| self.accepts(&file.name))
    }
}

/// Ordered filename rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameRules {
    rules: Vec<FilenameRule>,
}

impl FilenameRules {
    pub fn new(rules: Vec<FilenameRule>) -> Self {
        Self { rules }
    }

    /// Build rules from their config form
    ///
    /// # Errors
    /// `Error::Config` for a rule without file names, without formats, or
    /// naming an unknown format.
    pub fn from_config(rules: &[RuleConfig]) -> Result<Self> {
        rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                if rule.filenames.is_empty() {
                    return Err(Error::Config(format!("Rule {} has no filenames", index)));
                }
                let flags = FormatFlag::from_names(&rule.formats).ok_or_else(|| {
                    Error::Config(format!(
                        "Rule {} names an unknown format: {:?}",
                        index, rule.formats
                    ))
                })?;
                if flags.is_empty() {
                    return Err(Error::Config(format!("Rule {} has no formats", index)));
                }
                Ok(FilenameRule::new(&rule.filenames, flags))
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilenameRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for FilenameRules {
    /// Built-in table: `info.json` first, then `info.txt`
    fn default() -> Self {
        Self::new(vec![
            FilenameRule::new(["info.json"], FormatFlag::EZE | FormatFlag::HDOUJIN),
            FilenameRule::new(["info.txt"], FormatFlag::EHDOWNLOADER | FormatFlag::HDOUJIN),
        ])
    }
}
