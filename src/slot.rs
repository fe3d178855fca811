//! Slot addressing inside a drawer.
//!
//! A drawer holds 11 rows. Row `r` is drawn `r + 2` slots wide; rows 0..=9
//! use every one of them. The last row is short: of its 12 visual columns only
//! [`SHORT_ROW_COLUMNS`] hold a vial, and those are numbered 1..=4 in the
//! inventory. The visual column (used for drawing) and the position number
//! (used for lookup) therefore differ on that row only.

use serde::Deserialize;

use crate::errors::ConfigError;

/// Number of rows in a drawer.
pub const ROW_COUNT: usize = 11;

/// Index of the short last row.
pub const SHORT_ROW: usize = 10;

/// Visual columns of the short row that hold a slot, in position order.
pub const SHORT_ROW_COLUMNS: [usize; 4] = [3, 4, 7, 8];

/// Number of visual columns on `row` (the short row keeps its nominal width).
#[inline]
pub fn row_width(row: usize) -> usize {
    row + 2
}

/// Number of real slots on `row`.
#[inline]
pub fn slot_count(row: usize) -> usize {
    if row == SHORT_ROW {
        SHORT_ROW_COLUMNS.len()
    } else {
        row_width(row)
    }
}

/// 0-based rank of a short-row visual column, `None` if no slot is there.
#[inline]
pub fn short_row_rank(column: usize) -> Option<usize> {
    SHORT_ROW_COLUMNS.iter().position(|&c| c == column)
}

/// Row labels, one per row, top row first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct RowLetters(Vec<String>);

impl RowLetters {
    pub fn new(labels: Vec<String>) -> Result<Self, ConfigError> {
        if labels.len() != ROW_COUNT {
            return Err(ConfigError::RowLetters {
                expected: ROW_COUNT,
                found: labels.len(),
            });
        }
        Ok(RowLetters(labels))
    }

    /// Label of `row`. Panics on a row outside the drawer, which
    /// [`resolve_slot`] never asks for.
    pub fn letter(&self, row: usize) -> &str {
        &self.0[row]
    }

    /// Canonical spelling of a stored position code.
    ///
    /// The label part is matched case-insensitively against the configured
    /// labels and the number loses leading zeros: `" c04"` becomes `"C4"`.
    /// Returns `None` when the code does not name any label.
    pub fn canonical_position(&self, code: &str) -> Option<String> {
        let code = code.trim();
        let split = code.find(|c: char| c.is_ascii_digit())?;
        let (label, digits) = code.split_at(split);
        let number: usize = digits.trim().parse().ok()?;
        let label = label.trim();
        self.0
            .iter()
            .find(|l| l.eq_ignore_ascii_case(label))
            .map(|l| format!("{l}{number}"))
    }
}

impl Default for RowLetters {
    fn default() -> Self {
        RowLetters(('A'..='K').map(String::from).collect())
    }
}

impl TryFrom<Vec<String>> for RowLetters {
    type Error = ConfigError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        RowLetters::new(labels)
    }
}

/// A resolved slot: where it is drawn and how the inventory names it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotAddress {
    pub drawer: u32,
    /// Row index, 0..=10.
    pub row: usize,
    /// Visual column index on the row.
    pub column: usize,
    /// 1-based position number within the row.
    pub number: usize,
    /// Position key such as `"C4"`.
    pub key: String,
}

/// Resolve a visual `(row, column)` of `drawer` to a slot.
///
/// Returns `None` when there is no slot at that place: a short-row column
/// outside [`SHORT_ROW_COLUMNS`], a column past the row width, or a row past
/// the drawer. Callers skip those silently.
pub fn resolve_slot(
    letters: &RowLetters,
    drawer: u32,
    row: usize,
    column: usize,
) -> Option<SlotAddress> {
    if row >= ROW_COUNT || column >= row_width(row) {
        return None;
    }
    let rank = if row == SHORT_ROW {
        short_row_rank(column)?
    } else {
        column
    };
    let number = rank + 1;
    Some(SlotAddress {
        drawer,
        row,
        column,
        number,
        key: format!("{}{}", letters.letter(row), number),
    })
}

/// The slot a stored position key names in `drawer`, if any.
///
/// The key must be spelled exactly like a slot key (`"C4"`, not `"c04"`).
/// Drawer 0 holds nothing.
pub fn slot_at(letters: &RowLetters, drawer: u32, key: &str) -> Option<SlotAddress> {
    if drawer == 0 {
        return None;
    }
    (0..ROW_COUNT).find_map(|row| {
        let number: usize = key.strip_prefix(letters.letter(row))?.parse().ok()?;
        if number == 0 || number > slot_count(row) {
            return None;
        }
        let column = if row == SHORT_ROW {
            SHORT_ROW_COLUMNS[number - 1]
        } else {
            number - 1
        };
        resolve_slot(letters, drawer, row, column).filter(|slot| slot.key == key)
    })
}

/// Every slot of `drawer`, row by row, left to right.
pub fn drawer_slots(letters: &RowLetters, drawer: u32) -> impl Iterator<Item = SlotAddress> + '_ {
    (0..ROW_COUNT).flat_map(move |row| {
        (0..row_width(row)).filter_map(move |column| resolve_slot(letters, drawer, row, column))
    })
}
