//! Slot geometry in axes units.
//!
//! Axes units run 0..1 on both axes with y pointing up, like the plotting axes
//! the drawer sheet was designed in. Each row is shifted left by `x_shift`
//! relative to the one above, which produces the rack's triangular stagger.

use glam::DVec2;
use serde::Deserialize;

use crate::errors::ConfigError;
use crate::slot::SHORT_ROW;
use crate::types::{check_finite, check_non_negative, check_positive};

/// Column number label over the first slot of the first row.
pub const FIRST_COLUMN_TEXT: DVec2 = DVec2::new(0.03, 0.10);
pub const FIRST_COLUMN_ARROW: DVec2 = DVec2::new(0.03, 0.09);
/// Column number label over the last slot of each regular row.
pub const LAST_COLUMN_TEXT: DVec2 = DVec2::new(0.04, 0.09);
pub const LAST_COLUMN_ARROW: DVec2 = DVec2::new(0.04, 0.08);
/// Arrows point down-left, towards the slot they number.
pub const ARROW_DELTA: DVec2 = DVec2::new(-0.01, -0.02);
/// Row name, left of the first column.
pub const ROW_LABEL_TEXT: DVec2 = DVec2::new(-0.12, -0.01);
/// The short row has no slot at column 0, so its name sits closer in.
pub const SHORT_ROW_LABEL_TEXT: DVec2 = DVec2::new(-0.05, -0.01);
/// Sample name and date, above and below the slot centre.
pub const NAME_OFFSET: DVec2 = DVec2::new(0.0, 0.01);
pub const DATE_OFFSET: DVec2 = DVec2::new(0.0, -0.01);

/// Circle geometry as written in the configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CircleSpec {
    pub top_left: [f64; 2],
    pub diameter: f64,
    pub pad: [f64; 2],
    pub x_shift: f64,
}

/// Validated slot grid geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Centre of the first slot of the first row.
    pub origin: DVec2,
    pub diameter: f64,
    pub pad: DVec2,
    pub x_shift: f64,
}

impl GridLayout {
    pub fn new(spec: &CircleSpec) -> Result<Self, ConfigError> {
        let geometry = |field: &'static str| move |reason| ConfigError::Geometry { field, reason };
        let origin = DVec2::new(
            check_finite(spec.top_left[0]).map_err(geometry("circle.top_left"))?,
            check_finite(spec.top_left[1]).map_err(geometry("circle.top_left"))?,
        );
        let diameter = check_positive(spec.diameter).map_err(geometry("circle.diameter"))?;
        let pad = DVec2::new(
            check_non_negative(spec.pad[0]).map_err(geometry("circle.pad"))?,
            check_non_negative(spec.pad[1]).map_err(geometry("circle.pad"))?,
        );
        let x_shift = check_finite(spec.x_shift).map_err(geometry("circle.x_shift"))?;
        Ok(GridLayout {
            origin,
            diameter,
            pad,
            x_shift,
        })
    }

    /// Centre of the slot at a visual `(row, column)`.
    pub fn slot_center(&self, row: usize, column: usize) -> DVec2 {
        let (row, column) = (row as f64, column as f64);
        DVec2::new(
            self.origin.x + column * (self.diameter + self.pad.x) - row * self.x_shift,
            self.origin.y - row * (self.diameter + self.pad.y),
        )
    }

    /// Labels anchored on the slot at a visual `(row, column)` of a row that is
    /// `row_width` columns wide.
    ///
    /// Anchors are produced for visual positions, whether or not a slot exists
    /// there: the short row still gets its row name at column 0.
    pub fn label_anchors(&self, row: usize, column: usize, row_width: usize) -> Vec<LabelAnchor> {
        let center = self.slot_center(row, column);
        let mut anchors = Vec::new();
        if row == 0 && column == 0 {
            anchors.push(LabelAnchor {
                kind: LabelKind::ColumnNumber(column + 1),
                text_at: center + FIRST_COLUMN_TEXT,
                arrow: Some(ArrowAnchor {
                    from: center + FIRST_COLUMN_ARROW,
                    delta: ARROW_DELTA,
                }),
            });
        }
        if column + 1 == row_width && row < SHORT_ROW {
            anchors.push(LabelAnchor {
                kind: LabelKind::ColumnNumber(column + 1),
                text_at: center + LAST_COLUMN_TEXT,
                arrow: Some(ArrowAnchor {
                    from: center + LAST_COLUMN_ARROW,
                    delta: ARROW_DELTA,
                }),
            });
        }
        if column == 0 {
            let delta = if row == SHORT_ROW {
                SHORT_ROW_LABEL_TEXT
            } else {
                ROW_LABEL_TEXT
            };
            anchors.push(LabelAnchor {
                kind: LabelKind::RowName(row),
                text_at: center + delta,
                arrow: None,
            });
        }
        anchors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// 1-based column number.
    ColumnNumber(usize),
    /// Row index; rendered with its configured letter.
    RowName(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowAnchor {
    pub from: DVec2,
    pub delta: DVec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelAnchor {
    pub kind: LabelKind,
    pub text_at: DVec2,
    pub arrow: Option<ArrowAnchor>,
}
