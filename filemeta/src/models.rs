//! Gallery metadata entities and the aggregate record committed to the host

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Language name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
}

/// Gallery title, optionally tagged with its language
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Title {
    pub name: String,
    pub language: Option<Language>,
}

/// Group credited alongside an artist
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Circle {
    pub name: String,
}

/// Artist and the circles credited with them
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub circles: BTreeSet<Circle>,
}

/// Parodied work
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Parody {
    pub name: String,
}

/// Gallery category (e.g. "Doujinshi", "Manga")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

/// Tag grouping label
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
}

/// Tag, optionally namespaced
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub namespace: Option<Namespace>,
}

/// Source URL
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Url {
    pub value: String,
}

impl Language {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Circle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Parody {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Url {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Title {
    /// Title without a language
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }
}

impl Artist {
    /// Artist with no circles
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            circles: BTreeSet::new(),
        }
    }
}

impl Tag {
    /// Tag without a namespace
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    pub fn in_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = Some(namespace);
        self
    }
}

/// Normalized metadata for one gallery
///
/// `None` means "not provided"; the host store leaves such fields alone.
/// Multi-valued fields are sets, so duplicates collapse on insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryData {
    pub titles: Option<BTreeSet<Title>>,
    pub artists: Option<BTreeSet<Artist>>,
    pub parodies: Option<BTreeSet<Parody>>,
    pub category: Option<Category>,
    pub language: Option<Language>,
    pub tags: Option<BTreeSet<Tag>>,
    pub pub_date: Option<DateTime<FixedOffset>>,
    pub urls: Option<BTreeSet<Url>>,
}

impl GalleryData {
    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.applied_fields().is_empty()
    }

    /// Names of the fields that are set
    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.titles.is_some() {
            names.push("titles");
        }
        if self.artists.is_some() {
            names.push("artists");
        }
        if self.parodies.is_some() {
            names.push("parodies");
        }
        if self.category.is_some() {
            names.push("category");
        }
        if self.language.is_some() {
            names.push("language");
        }
        if self.tags.is_some() {
            names.push("tags");
        }
        if self.pub_date.is_some() {
            names.push("pub_date");
        }
        if self.urls.is_some() {
            names.push("urls");
        }
        names
    }
}

/// Opaque merge options forwarded unchanged to the host store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitOptions(pub serde_json::Map<String, serde_json::Value>);

impl CommitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of one option, if set
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record() {
        let data = GalleryData::default();
        assert!(data.is_empty());
        assert!(data.applied_fields().is_empty());
    }

    #[test]
    fn test_applied_fields_in_order() {
        let data = GalleryData {
            category: Some(Category::new("Manga")),
            urls: Some(BTreeSet::from([Url::new("https://example.org")])),
            ..Default::default()
        };
        assert_eq!(data.applied_fields(), vec!["category", "urls"]);
    }

    #[test]
    fn test_structural_dedup() {
        let mut tags = BTreeSet::new();
        tags.insert(Tag::new("romance").in_namespace(Namespace::new("female")));
        tags.insert(Tag::new("romance").in_namespace(Namespace::new("female")));
        tags.insert(Tag::new("romance"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_commit_options_serialize_transparently() {
        let options: CommitOptions =
            serde_json::from_value(serde_json::json!({"replace": true})).unwrap();
        assert_eq!(options.get("replace"), Some(&serde_json::json!(true)));
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({"replace": true})
        );
    }
}
