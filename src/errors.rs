//! Error types with diagnostics using miette
//!
//! Everything here is fatal: a configuration that fails to validate aborts the
//! run before a single record is normalized or a single page is drawn.
//! Data-quality problems found while rendering are not errors; see
//! [`crate::inventory::SlotConflict`].

use miette::Diagnostic;
use thiserror::Error;

use crate::types::NumericError;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors raised while reading and validating the configuration document
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    #[diagnostic(code(drawermap::config::json))]
    Json(#[source] serde_json::Error),

    #[error("configuration has no `{section}` section")]
    #[diagnostic(code(drawermap::config::missing_section))]
    MissingSection { section: &'static str },

    #[error("taxonomy has no `{category}` category")]
    #[diagnostic(
        code(drawermap::config::missing_category),
        help("`clean` must define `organism`, `disease` and `tissue`")
    )]
    MissingCategory { category: &'static str },

    #[error("taxonomy category `{category}` is not an object of keys")]
    #[diagnostic(code(drawermap::config::category_not_a_map))]
    CategoryNotAMap { category: String },

    #[error("patterns for `{category}.{key}` must be a list of strings")]
    #[diagnostic(
        code(drawermap::config::patterns_not_a_list),
        help("list the patterns as an array of strings; an empty array is allowed")
    )]
    PatternsNotAList { category: String, key: String },

    #[error("pattern `{pattern}` for `{category}.{key}` does not compile")]
    #[diagnostic(code(drawermap::config::invalid_pattern))]
    InvalidPattern {
        category: String,
        key: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("expected {expected} row letters, found {found}")]
    #[diagnostic(code(drawermap::config::row_letters))]
    RowLetters { expected: usize, found: usize },

    #[error("invalid geometry value `{field}`: {reason}")]
    #[diagnostic(code(drawermap::config::geometry))]
    Geometry {
        field: &'static str,
        reason: NumericError,
    },

    #[error("invalid color `{value}`")]
    #[diagnostic(
        code(drawermap::config::color),
        help("use a CSS name, `#rrggbb`, or an `[r, g, b]` triple in 0..1")
    )]
    Color { value: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
