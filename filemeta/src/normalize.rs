//! Metadata normalization
//!
//! Turns shape-validated [`RawFields`] into a [`GalleryData`] record:
//! - Falsy leaves are dropped before any entity is built
//! - Titles are HTML-unescaped
//! - Artist, circle and parody names are capitalize-normalized
//! - Tag namespaces are trimmed and "misc" means no namespace
//! - Every multi-valued field is a set (structural duplicates collapse)
//!
//! Mismatched fields were already logged during validation and are simply
//! not applied here.

use crate::config::PluginConfig;
use crate::models::{
    Artist, Category, Circle, GalleryData, Language, Namespace, Parody, Tag, Title, Url,
};
use crate::raw_fields::{Leaf, RawFields};
use crate::types::FieldMap;
use std::collections::BTreeSet;
use tracing::debug;

/// Namespace treated as "no namespace"
const MISC_NAMESPACE: &str = "misc";

/// Capitalize each word: first character upper-case, rest lower-case
///
/// Surrounding whitespace is removed and inner runs of whitespace collapse
/// to a single space.
pub fn capitalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Decode HTML character references the way an HTML5 parser does in text
///
/// Legacy named references without a trailing semicolon (`&amp`, `&gt`)
/// are decoded and invalid numeric references become U+FFFD.
pub fn unescape_html(text: &str) -> String {
    htmlize::unescape(text).into_owned()
}

/// Canonical namespace: trimmed, `None` when empty or "misc"
pub fn canonical_namespace(namespace: Option<&str>) -> Option<String> {
    let trimmed = namespace?.trim();
    if trimmed.is_empty() || trimmed.to_lowercase() == MISC_NAMESPACE {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Non-empty leaf text
fn truthy(leaf: &Leaf) -> Option<&str> {
    leaf.as_deref().filter(|s| !s.is_empty())
}

fn non_empty_set<T: Ord>(items: BTreeSet<T>) -> Option<BTreeSet<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Metadata normalizer
#[derive(Debug, Clone)]
pub struct Normalizer {
    capitalize_names: bool,
}

impl Normalizer {
    /// Normalizer following the given plugin configuration
    pub fn new(config: &PluginConfig) -> Self {
        Self {
            capitalize_names: config.capitalize_names,
        }
    }

    /// Validate and normalize an accumulated field map
    pub fn normalize_map(&self, fields: &FieldMap) -> GalleryData {
        self.normalize(&RawFields::from_map(fields))
    }

    /// Build the aggregate record from validated fields
    pub fn normalize(&self, raw: &RawFields) -> GalleryData {
        let data = GalleryData {
            titles: raw.titles.present().and_then(|t| self.titles(t)),
            artists: raw.artists.present().and_then(|a| self.artists(a)),
            parodies: raw.parodies.present().and_then(|p| self.parodies(p)),
            category: raw.category.present().map(Category::new),
            language: raw.language.present().map(Language::new),
            tags: raw.tags.present().and_then(|t| self.tags(t)),
            pub_date: raw.pub_date.present().copied(),
            urls: raw.urls.present().and_then(|u| self.urls(u)),
        };

        for field in data.applied_fields() {
            debug!("applied {}", field);
        }
        data
    }

    fn name(&self, text: &str) -> Option<String> {
        let name = if self.capitalize_names {
            capitalize_text(text)
        } else {
            text.trim().to_string()
        };
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    fn titles(&self, pairs: &[(Leaf, Leaf)]) -> Option<BTreeSet<Title>> {
        let titles = pairs
            .iter()
            .filter_map(|(text, language)| {
                let text = truthy(text)?;
                let title = Title::new(unescape_html(text));
                Some(match truthy(language) {
                    Some(language) => title.with_language(Language::new(language)),
                    None => title,
                })
            })
            .collect();
        non_empty_set(titles)
    }

    fn artists(&self, pairs: &[(Leaf, Vec<Leaf>)]) -> Option<BTreeSet<Artist>> {
        let artists = pairs
            .iter()
            .filter_map(|(name, circles)| {
                let mut artist = Artist::new(self.name(truthy(name)?)?);
                artist.circles = circles
                    .iter()
                    .filter_map(|circle| self.name(truthy(circle)?).map(Circle::new))
                    .collect();
                Some(artist)
            })
            .collect();
        non_empty_set(artists)
    }

    fn parodies(&self, names: &[Leaf]) -> Option<BTreeSet<Parody>> {
        let parodies = names
            .iter()
            .filter_map(|name| self.name(truthy(name)?).map(Parody::new))
            .collect();
        non_empty_set(parodies)
    }

    fn tags(&self, groups: &[(Option<String>, Vec<Leaf>)]) -> Option<BTreeSet<Tag>> {
        let mut tags = BTreeSet::new();
        for (namespace, names) in groups {
            let namespace = canonical_namespace(namespace.as_deref());
            for name in names.iter().filter_map(|n| n.as_deref()) {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                let tag = Tag::new(name);
                tags.insert(match &namespace {
                    Some(ns) => tag.in_namespace(Namespace::new(ns.clone())),
                    None => tag,
                });
            }
        }
        non_empty_set(tags)
    }

    fn urls(&self, urls: &[Leaf]) -> Option<BTreeSet<Url>> {
        let urls = urls.iter().filter_map(|u| truthy(u).map(Url::new)).collect();
        non_empty_set(urls)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&PluginConfig::default())
    }
}
