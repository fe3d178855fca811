//! Core value types: inventory records, categories, colors, numeric checks.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::ConfigError;

/// Value written into a classification field that no pattern matched.
pub const UNKNOWN: &str = "unknown";

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Reject NaN and infinite values.
#[inline]
pub fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Reject NaN, infinite, zero and negative values.
#[inline]
pub fn check_positive(val: f64) -> Result<f64, NumericError> {
    let val = check_finite(val)?;
    if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Reject NaN, infinite and negative values.
#[inline]
pub fn check_non_negative(val: f64) -> Result<f64, NumericError> {
    let val = check_finite(val)?;
    if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

// ============================================================================
// Categories
// ============================================================================

/// A classification field normalized against the taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Organism,
    Disease,
    Tissue,
}

impl Category {
    /// Processing order. Categories never interact, but logs follow this order.
    pub const ALL: [Category; 3] = [Category::Organism, Category::Disease, Category::Tissue];

    pub fn name(self) -> &'static str {
        match self {
            Category::Organism => "organism",
            Category::Disease => "disease",
            Category::Tissue => "tissue",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Records
// ============================================================================

/// Freezing date of a sample.
///
/// Spreadsheet cells are not always real dates; text that does not parse is
/// kept and displayed as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SampleDate {
    Day(NaiveDate),
    Text(String),
}

impl fmt::Display for SampleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleDate::Day(d) => write!(f, "{}", d.format("%d-%m-%y")),
            SampleDate::Text(s) => f.write_str(s),
        }
    }
}

/// One inventory row as supplied by the tabular source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    /// Drawer number, 1-based.
    pub drawer: u32,
    /// Slot code such as `"C4"`.
    pub position: String,
    pub name: Option<String>,
    pub date: Option<SampleDate>,
    pub organism: Option<String>,
    pub tissue: Option<String>,
    pub disease: Option<String>,
}

impl Record {
    pub fn field(&self, category: Category) -> Option<&str> {
        match category {
            Category::Organism => self.organism.as_deref(),
            Category::Disease => self.disease.as_deref(),
            Category::Tissue => self.tissue.as_deref(),
        }
    }
}

/// A record whose classification fields hold a canonical key or [`UNKNOWN`].
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedRecord {
    pub drawer: u32,
    pub position: String,
    pub name: Option<String>,
    pub date: Option<SampleDate>,
    pub organism: String,
    pub tissue: String,
    pub disease: String,
}

impl NormalizedRecord {
    pub fn field(&self, category: Category) -> &str {
        match category {
            Category::Organism => &self.organism,
            Category::Disease => &self.disease,
            Category::Tissue => &self.tissue,
        }
    }

    /// The sample name, if present and not blank.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Feed a normalized record back to the normalizer.
///
/// Normalizing the result again only changes nothing when every key is matched
/// by one of its own patterns (`"human": ["human", ...]`). A key whose patterns
/// miss its own name becomes `"unknown"` on the second pass.
impl From<NormalizedRecord> for Record {
    fn from(r: NormalizedRecord) -> Self {
        Record {
            drawer: r.drawer,
            position: r.position,
            name: r.name,
            date: r.date,
            organism: Some(r.organism),
            tissue: Some(r.tissue),
            disease: Some(r.disease),
        }
    }
}

// ============================================================================
// Colors
// ============================================================================

/// Fill and stroke colors accepted by the configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "ColorSpec")]
pub enum Color {
    Named(String),
    Rgb(u8, u8, u8),
}

impl Color {
    pub fn named(name: &str) -> Color {
        Color::Named(name.to_string())
    }

    /// Build from a matplotlib-style `[r, g, b]` triple with channels in 0..1.
    pub fn from_unit_rgb(rgb: [f64; 3]) -> Result<Color, ConfigError> {
        let mut out = [0u8; 3];
        for (o, c) in out.iter_mut().zip(rgb) {
            if !(0.0..=1.0).contains(&c) {
                return Err(ConfigError::Color {
                    value: format!("{:?}", rgb),
                });
            }
            *o = (c * 255.0).round() as u8;
        }
        Ok(Color::Rgb(out[0], out[1], out[2]))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Named(s) => write!(f, "{}", s),
            Color::Rgb(r, g, b) => write!(f, "rgb({},{},{})", r, g, b),
        }
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ConfigError::Color {
            value: s.to_string(),
        };
        if let Some(hex) = s.strip_prefix('#') {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            return Ok(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
        }
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(Color::Named(s.to_ascii_lowercase()));
        }
        Err(invalid())
    }
}

/// Raw color as written in the configuration document.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Text(String),
    Triple([f64; 3]),
}

impl TryFrom<ColorSpec> for Color {
    type Error = ConfigError;

    fn try_from(spec: ColorSpec) -> Result<Self, Self::Error> {
        match spec {
            ColorSpec::Text(s) => s.parse(),
            ColorSpec::Triple(rgb) => Color::from_unit_rgb(rgb),
        }
    }
}
