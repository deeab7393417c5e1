//! The tagset: a declarative three-level classification catalog
//! (category -> subcategory -> {tag, values}) loaded once at startup and
//! consulted read-only thereafter by the `Tagger`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DetokError, Result};

/// The embedded default tagset: commands, operators, strings, numbers,
/// variables, punctuations, constants, data, system and unknown
/// categories, each broken into tagged subcategories.
const DEFAULT_TAGSET_JSON: &str = include_str!("tagset.default.json");

/// A single value a token's literal text may match against.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    /// A literal keyword or punctuation spelling
    Str(String),
    /// A literal numeric value (unused by the default tagset, but part of
    /// the declared schema for dialects that classify by numeric literal)
    Int(i64),
}

impl PartialEq<str> for TagValue {
    fn eq(&self, other: &str) -> bool {
        matches!(self, TagValue::Str(s) if s == other)
    }
}

/// One leaf of the tagset: the tag identifier and the literal values that
/// match it, if classification is value-driven rather than structural.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TagInfo {
    /// The tag string attached to matching tokens.
    pub tag: String,
    /// Literal values that match this tag, or `None` when the tag is
    /// assigned structurally (e.g. "any digit byte") rather than by a
    /// fixed value set.
    pub values: Option<Vec<TagValue>>,
}

impl TagInfo {
    /// Whether `text` appears in this tag's value set.
    pub fn matches(&self, text: &str) -> bool {
        match &self.values {
            Some(values) => values.iter().any(|v| v == text),
            None => false,
        }
    }
}

type Subcategories = HashMap<String, TagInfo>;

/// The loaded tagset: category name -> subcategory name -> `TagInfo`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tagset(HashMap<String, Subcategories>);

/// Fallback tag used when no rule in the tagset matches a byte at all.
pub const UNKNOWN_SENTINEL_TAG: &str = "?_unknown";

impl Tagset {
    /// Parse a tagset from its JSON representation.
    pub fn from_json(json: &str) -> Result<Tagset> {
        let tagset = serde_json::from_str(json)?;
        Ok(tagset)
    }

    /// Load a tagset from a JSON file on disk.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Tagset> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DetokError::invalid_tagset_path(format!("{}: {}", path.display(), e))
        })?;
        Tagset::from_json(&contents)
    }

    /// The tagset baked into the crate.
    pub fn embedded_default() -> Tagset {
        Tagset::from_json(DEFAULT_TAGSET_JSON)
            .expect("embedded default tagset must parse")
    }

    /// The tag string for a given category/subcategory pair.
    ///
    /// Falls back to [`UNKNOWN_SENTINEL_TAG`] if either level is absent,
    /// so a caller-supplied tagset missing an optional subcategory degrades
    /// gracefully instead of panicking mid-decode.
    pub fn tag(&self, category: &str, subcategory: &str) -> &str {
        self.0
            .get(category)
            .and_then(|subs| subs.get(subcategory))
            .map(|info| info.tag.as_str())
            .unwrap_or(UNKNOWN_SENTINEL_TAG)
    }

    /// Search every subcategory of `category`, in declaration order, for
    /// one whose `values` contains `text`; return its tag if found.
    pub fn find_tag_by_value(&self, category: &str, text: &str) -> Option<&str> {
        let subs = self.0.get(category)?;
        subs.values()
            .find(|info| info.matches(text))
            .map(|info| info.tag.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_default_parses() {
        let tagset = Tagset::embedded_default();
        assert_eq!(tagset.tag("strings", "string"), "SST");
        assert_eq!(tagset.tag("numbers", "integer"), "NIN");
        assert_eq!(tagset.tag("variables", "real"), "VR");
        assert_eq!(tagset.tag("unknown", "unknown"), "UNK");
    }

    #[test]
    fn test_tag_fallback_on_missing_entry() {
        let tagset = Tagset::embedded_default();
        assert_eq!(tagset.tag("nope", "nope"), UNKNOWN_SENTINEL_TAG);
    }

    #[test]
    fn test_find_tag_by_value_commands() {
        let tagset = Tagset::embedded_default();
        assert_eq!(tagset.find_tag_by_value("commands", "PRINT"), Some("CPR"));
        assert_eq!(tagset.find_tag_by_value("commands", "GOTO"), Some("CFL"));
        assert_eq!(tagset.find_tag_by_value("commands", "STR$"), Some("CFN"));
        assert_eq!(tagset.find_tag_by_value("commands", "NOPE"), None);
    }

    #[test]
    fn test_find_tag_by_value_operators() {
        let tagset = Tagset::embedded_default();
        assert_eq!(tagset.find_tag_by_value("operators", "<="), Some("ORE"));
        assert_eq!(tagset.find_tag_by_value("operators", "AND"), Some("OLO"));
    }

    #[test]
    fn test_roundtrip_through_json() {
        let tagset = Tagset::embedded_default();
        let json = serde_json::to_string(&tagset).unwrap();
        let reloaded = Tagset::from_json(&json).unwrap();
        assert_eq!(reloaded.tag("strings", "string"), "SST");
    }

    #[test]
    fn test_load_file_missing_path() {
        let err = Tagset::load_file("/nonexistent/path/tagset.json").unwrap_err();
        assert!(matches!(err, DetokError::InvalidTagsetPath(_)));
    }
}
