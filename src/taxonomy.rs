//! Controlled vocabulary for the classification fields.
//!
//! A taxonomy maps each [`Category`] to an ordered list of canonical keys, and
//! each key to an ordered list of pattern fragments. Declaration order is kept
//! exactly as written in the configuration: the normalizer applies keys in that
//! order and a later key overwrites an earlier one.
//!
//! Patterns are compiled once, when the configuration is validated. After that
//! nothing about the taxonomy can fail.

use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::errors::ConfigError;
use crate::log::warn;
use crate::types::Category;

/// Characters removed from both values and patterns before matching.
pub const STRIPPED_CHARS: [char; 6] = ['-', '_', '^', '(', ')', ' '];

/// Remove [`STRIPPED_CHARS`] from `s`.
pub fn clean_value(s: &str) -> String {
    s.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect()
}

/// Turn a pattern fragment into a containment regex.
///
/// The fragment is cleaned like a value, wrapped as `.*<fragment>.*`, and any
/// `.*.*.*` run produced by a fragment that already starts or ends with a
/// wildcard is collapsed to a single `.*`. The collapse is a single
/// left-to-right pass over non-overlapping occurrences.
pub fn wrap_pattern(fragment: &str) -> String {
    format!(".*{}.*", clean_value(fragment)).replace(".*.*.*", ".*")
}

/// A compiled pattern: case-insensitive (Unicode case folding), anchored at the
/// start of the cleaned value.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    fragment: String,
    regex: Regex,
}

impl PatternMatcher {
    pub fn new(fragment: &str) -> Result<Self, regex::Error> {
        let anchored = format!("^(?:{})", wrap_pattern(fragment));
        let regex = RegexBuilder::new(&anchored).case_insensitive(true).build()?;
        Ok(Self {
            fragment: fragment.to_string(),
            regex,
        })
    }

    /// The fragment as written in the configuration.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// A missing value never matches.
    pub fn is_match(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| self.regex.is_match(&clean_value(v)))
    }
}

/// A canonical key and the patterns that map onto it.
#[derive(Debug, Clone)]
pub struct CanonicalKey {
    pub name: String,
    pub patterns: Vec<PatternMatcher>,
}

/// The ordered keys of one category.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub category: Category,
    pub keys: Vec<CanonicalKey>,
}

impl Vocabulary {
    pub fn contains_key(&self, name: &str) -> bool {
        self.keys.iter().any(|k| k.name == name)
    }
}

/// Compiled taxonomy for all three categories.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    organism: Vocabulary,
    disease: Vocabulary,
    tissue: Vocabulary,
}

impl Taxonomy {
    pub fn vocabulary(&self, category: Category) -> &Vocabulary {
        match category {
            Category::Organism => &self.organism,
            Category::Disease => &self.disease,
            Category::Tissue => &self.tissue,
        }
    }

    /// Parse and compile a taxonomy from the JSON object found under `clean`.
    pub fn from_json_str(json: &str) -> Result<Taxonomy, ConfigError> {
        let raw: RawTaxonomy = serde_json::from_str(json)?;
        Taxonomy::from_raw(&raw)
    }

    pub(crate) fn from_raw(raw: &RawTaxonomy) -> Result<Taxonomy, ConfigError> {
        for name in raw.keys() {
            if !Category::ALL.iter().any(|c| c.name() == name) {
                warn!(category = %name, "ignoring unknown taxonomy category");
            }
        }
        Ok(Taxonomy {
            organism: compile_category(raw, Category::Organism)?,
            disease: compile_category(raw, Category::Disease)?,
            tissue: compile_category(raw, Category::Tissue)?,
        })
    }
}

fn compile_category(raw: &RawTaxonomy, category: Category) -> Result<Vocabulary, ConfigError> {
    let entry = raw
        .get(category.name())
        .ok_or(ConfigError::MissingCategory {
            category: category.name(),
        })?;
    let RawCategory::Keys(keys) = entry else {
        return Err(ConfigError::CategoryNotAMap {
            category: category.name().to_string(),
        });
    };

    let mut compiled = Vec::with_capacity(keys.len());
    for (key, patterns) in keys {
        let RawPatterns::List(fragments) = patterns else {
            return Err(ConfigError::PatternsNotAList {
                category: category.name().to_string(),
                key: key.clone(),
            });
        };
        let patterns = fragments
            .iter()
            .map(|fragment| {
                PatternMatcher::new(fragment).map_err(|source| ConfigError::InvalidPattern {
                    category: category.name().to_string(),
                    key: key.clone(),
                    pattern: fragment.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        compiled.push(CanonicalKey {
            name: key.clone(),
            patterns,
        });
    }
    Ok(Vocabulary {
        category,
        keys: compiled,
    })
}

// ============================================================================
// Raw (unvalidated) shape, as deserialized from the configuration
// ============================================================================

/// Category name to keys, in document order.
pub(crate) type RawTaxonomy = IndexMap<String, RawCategory>;

/// Untagged so that structural mistakes surface as [`ConfigError`]s naming the
/// offending category or key, rather than as a bare JSON error.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawCategory {
    Keys(IndexMap<String, RawPatterns>),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPatterns {
    List(Vec<String>),
    Other(serde_json::Value),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_punctuation_and_spaces() {
        assert_eq!(clean_value("Mus_musculus "), "Musmusculus");
        assert_eq!(clean_value("(H. sapiens)-^x"), "H.sapiensx");
        assert_eq!(clean_value("tab\tkept"), "tab\tkept");
    }

    #[test]
    fn wrap_collapses_triple_wildcards() {
        assert_eq!(wrap_pattern("mouse"), ".*mouse.*");
        assert_eq!(wrap_pattern(".*"), ".*");
        assert_eq!(wrap_pattern(""), ".*.*");
        assert_eq!(wrap_pattern(".*.*"), ".*.*");
        // Only `.*.*.*` runs collapse; a double wildcard stays.
        assert_eq!(wrap_pattern(".*mouse"), ".*.*mouse.*");
        assert_eq!(wrap_pattern("a.*.*b"), ".*a.*.*b.*");
    }

    #[test]
    fn pattern_fragment_is_cleaned_like_a_value() {
        let m = PatternMatcher::new("mus musculus").unwrap();
        assert!(m.is_match(Some("Mus_musculus ")));
        assert_eq!(m.fragment(), "mus musculus");
    }

    #[test]
    fn matcher_is_case_insensitive_containment() {
        let m = PatternMatcher::new("hela").unwrap();
        assert!(m.is_match(Some("HeLa S3")));
        assert!(m.is_match(Some("cervix HELA")));
        assert!(!m.is_match(Some("HEK293")));
        assert!(!m.is_match(None));
    }

    #[test]
    fn case_folding_covers_accented_letters() {
        let m = PatternMatcher::new("épithélium").unwrap();
        assert!(m.is_match(Some("ÉPITHÉLIUM")));
        assert!(m.is_match(Some("Épithélium cilié")));
        assert!(!m.is_match(Some("epithelium")));

        let m = PatternMatcher::new("œsophage").unwrap();
        assert!(m.is_match(Some("Œsophage")));

        // Escapes keep their meaning under case folding.
        let m = PatternMatcher::new(r"\d+cm").unwrap();
        assert!(m.is_match(Some("biopsie 12 CM")));
    }

    #[test]
    fn alternation_stays_anchored() {
        // `.*breast|lung.*`: the second branch must start the value.
        let m = PatternMatcher::new("breast|lung").unwrap();
        assert!(m.is_match(Some("lung adenocarcinoma")));
        assert!(m.is_match(Some("left breast")));
        assert!(!m.is_match(Some("small cell lung")));
    }

    #[test]
    fn key_order_is_preserved() {
        let t = Taxonomy::from_json_str(
            r#"{
                "organism": {"zebra": ["z"], "alpha": ["a"], "mid": []},
                "disease": {},
                "tissue": {}
            }"#,
        )
        .unwrap();
        let names: Vec<_> = t
            .vocabulary(Category::Organism)
            .keys
            .iter()
            .map(|k| k.name.as_str())
            .collect();
        assert_eq!(names, ["zebra", "alpha", "mid"]);
        assert!(t.vocabulary(Category::Organism).contains_key("mid"));
        assert!(t.vocabulary(Category::Disease).keys.is_empty());
    }

    #[test]
    fn missing_category_is_fatal() {
        let err = Taxonomy::from_json_str(r#"{"organism": {}, "disease": {}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCategory { category: "tissue" }
        ));
    }

    #[test]
    fn non_list_patterns_are_fatal() {
        let err = Taxonomy::from_json_str(
            r#"{"organism": {"human": "human"}, "disease": {}, "tissue": {}}"#,
        )
        .unwrap_err();
        match err {
            ConfigError::PatternsNotAList { category, key } => {
                assert_eq!(category, "organism");
                assert_eq!(key, "human");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = Taxonomy::from_json_str(
            r#"{"organism": {}, "disease": {"cancer": [1, 2]}, "tissue": {}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::PatternsNotAList { .. }));
    }

    #[test]
    fn category_must_be_an_object() {
        let err = Taxonomy::from_json_str(r#"{"organism": [], "disease": {}, "tissue": {}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::CategoryNotAMap { .. }));
    }

    #[test]
    fn broken_regex_is_fatal() {
        let err = Taxonomy::from_json_str(
            r#"{"organism": {"bad": ["[a"]}, "disease": {}, "tissue": {}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }
}
