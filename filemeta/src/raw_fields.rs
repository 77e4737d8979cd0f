//! Typed view of an extractor field map
//!
//! Extractors produce loosely-typed [`FieldMap`]s. Before normalization each
//! recognized key is validated against its expected shape. A field is then
//! either absent, present with a validated value, or mismatched. Mismatched
//! fields are logged and skipped; they never fail the call.
//!
//! Leaves are kept as `Option<String>` (JSON `null` → `None`) so the
//! normalizer can apply its own falsy-leaf rules.

use crate::types::{is_falsy, FieldMap};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use filemeta_common::config::json_kind;
use serde_json::Value;
use tracing::warn;

/// Text leaf; `None` for JSON null
pub type Leaf = Option<String>;

/// Validation outcome for one field
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue<T> {
    /// Key missing, null or falsy
    #[default]
    Absent,
    /// Value of the expected shape
    Present(T),
    /// Value present but of an unexpected shape
    Mismatched {
        expected: &'static str,
        found: String,
    },
}

impl<T> FieldValue<T> {
    /// Validated value, if present
    pub fn present(&self) -> Option<&T> {
        match self {
            FieldValue::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_mismatched(&self) -> bool {
        matches!(self, FieldValue::Mismatched { .. })
    }
}

/// Shape-validated fields from one (accumulated) field map
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawFields {
    /// (text, language) pairs
    pub titles: FieldValue<Vec<(Leaf, Leaf)>>,
    /// (name, circle names) pairs
    pub artists: FieldValue<Vec<(Leaf, Vec<Leaf>)>>,
    pub parodies: FieldValue<Vec<Leaf>>,
    pub category: FieldValue<String>,
    pub language: FieldValue<String>,
    /// (namespace, tags) groups; a flat tag list becomes one `None` group
    pub tags: FieldValue<Vec<(Option<String>, Vec<Leaf>)>>,
    pub pub_date: FieldValue<DateTime<FixedOffset>>,
    pub urls: FieldValue<Vec<Leaf>>,
}

impl RawFields {
    /// Validate every recognized key of `map`
    ///
    /// Each mismatched field is logged at warn level.
    pub fn from_map(map: &FieldMap) -> Self {
        Self {
            titles: field(map, "titles", "array of [text, language] pairs", parse_titles),
            artists: field(map, "artists", "array of [name, [circles]] pairs", parse_artists),
            parodies: field(map, "parodies", "array of strings", parse_leaf_list),
            category: field(map, "category", "string", parse_scalar),
            language: field(map, "language", "string", parse_scalar),
            tags: field(
                map,
                "tags",
                "object of string arrays or array of strings",
                parse_tags,
            ),
            pub_date: field(map, "pub_date", "date/time", parse_pub_date),
            urls: field(map, "urls", "array of strings", parse_leaf_list),
        }
    }

    /// Names of fields skipped because of their shape
    pub fn mismatched_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("titles", self.titles.is_mismatched()),
            ("artists", self.artists.is_mismatched()),
            ("parodies", self.parodies.is_mismatched()),
            ("category", self.category.is_mismatched()),
            ("language", self.language.is_mismatched()),
            ("tags", self.tags.is_mismatched()),
            ("pub_date", self.pub_date.is_mismatched()),
            ("urls", self.urls.is_mismatched()),
        ];
        checks
            .into_iter()
            .filter(|(_, mismatched)| *mismatched)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Validate one key
///
/// `parse` returns `Ok(None)` for values that count as not provided and
/// `Err(found)` describing the offending part on shape mismatch.
fn field<T>(
    map: &FieldMap,
    key: &'static str,
    expected: &'static str,
    parse: fn(&Value) -> Result<Option<T>, String>,
) -> FieldValue<T> {
    let Some(value) = map.get(key) else {
        return FieldValue::Absent;
    };
    if value.is_null() {
        return FieldValue::Absent;
    }

    match parse(value) {
        Ok(Some(parsed)) => FieldValue::Present(parsed),
        Ok(None) => FieldValue::Absent,
        Err(found) => {
            warn!(
                field = key,
                expected = expected,
                found = %found,
                "Skipping field with unexpected shape"
            );
            FieldValue::Mismatched { expected, found }
        }
    }
}

fn leaf(value: &Value) -> Result<Leaf, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(format!("{} leaf", json_kind(other))),
    }
}

fn array(value: &Value) -> Result<&Vec<Value>, String> {
    value.as_array().ok_or_else(|| json_kind(value).to_string())
}

fn pair(value: &Value) -> Result<(&Value, &Value), String> {
    match value.as_array().map(Vec::as_slice) {
        Some([first, second]) => Ok((first, second)),
        Some(items) => Err(format!("{}-element array", items.len())),
        None => Err(format!("{} element", json_kind(value))),
    }
}

fn parse_leaf_list(value: &Value) -> Result<Option<Vec<Leaf>>, String> {
    array(value)?.iter().map(leaf).collect::<Result<Vec<_>, _>>().map(Some)
}

fn parse_titles(value: &Value) -> Result<Option<Vec<(Leaf, Leaf)>>, String> {
    array(value)?
        .iter()
        .map(|item| {
            let (text, language) = pair(item)?;
            Ok((leaf(text)?, leaf(language)?))
        })
        .collect::<Result<Vec<_>, String>>()
        .map(Some)
}

fn parse_artists(value: &Value) -> Result<Option<Vec<(Leaf, Vec<Leaf>)>>, String> {
    array(value)?
        .iter()
        .map(|item| {
            let (name, circles) = pair(item)?;
            let circles = match circles {
                Value::Null => Vec::new(),
                Value::Array(items) => items.iter().map(leaf).collect::<Result<Vec<_>, _>>()?,
                other => return Err(format!("{} circles", json_kind(other))),
            };
            Ok((leaf(name)?, circles))
        })
        .collect::<Result<Vec<_>, String>>()
        .map(Some)
}

fn parse_scalar(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other if is_falsy(other) => Ok(None),
        other => Err(json_kind(other).to_string()),
    }
}

fn parse_tags(value: &Value) -> Result<Option<Vec<(Option<String>, Vec<Leaf>)>>, String> {
    match value {
        Value::Array(_) => Ok(parse_leaf_list(value)?.map(|tags| vec![(None, tags)])),
        Value::Object(groups) => groups
            .iter()
            .map(|(namespace, tags)| {
                let tags = match tags {
                    Value::Null => Vec::new(),
                    Value::Array(items) => items.iter().map(leaf).collect::<Result<Vec<_>, _>>()?,
                    other => return Err(format!("{} under namespace '{}'", json_kind(other), namespace)),
                };
                Ok((Some(namespace.clone()), tags))
            })
            .collect::<Result<Vec<_>, String>>()
            .map(Some),
        other => Err(json_kind(other).to_string()),
    }
}

/// Accepted date formats without an offset; interpreted as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

fn parse_pub_date(value: &Value) -> Result<Option<DateTime<FixedOffset>>, String> {
    match value {
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_date_text(s.trim())
            .map(Some)
            .ok_or_else(|| format!("unrecognized date '{}'", s)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| Some(dt.fixed_offset()))
            .ok_or_else(|| format!("timestamp {}", n)),
        other => Err(json_kind(other).to_string()),
    }
}

fn parse_date_text(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc().fixed_offset())
}
