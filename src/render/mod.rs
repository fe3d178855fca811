//! Drawer pages
//!
//! This module is organized into submodules:
//! - `defaults`: Default page settings
//! - `shapes`: Drawing primitives and their SVG form
//! - `svg`: Page frame and SVG document generation
//!
//! [`build_page`] turns a [`DrawerPlan`] into a [`Page`]: an ordered list of
//! primitives in axes units. Nothing here knows about pixels; the
//! [`PageFrame`] does the mapping when the page is serialized.

pub mod defaults;
pub mod shapes;
pub mod svg;

use chrono::NaiveDateTime;
use glam::{DVec2, dvec2};
use serde::Deserialize;

pub use shapes::{Arrow, Draw, Ellipse, Image, Polygon, Primitive, Stroke, Text, TextAnchor, TextRun};
pub use svg::{PageFrame, to_svg};

use crate::inventory::{DrawerPlan, SlotFill};
use crate::layout::{DATE_OFFSET, GridLayout, LabelKind, NAME_OFFSET};
use crate::slot::{ROW_COUNT, RowLetters, row_width};
use crate::types::Color;

/// One drawer's drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub drawer: u32,
    pub primitives: Vec<Primitive>,
}

impl Page {
    pub fn new(drawer: u32) -> Self {
        Page {
            drawer,
            primitives: Vec::new(),
        }
    }

    pub fn push(&mut self, primitive: impl Into<Primitive>) {
        self.primitives.push(primitive.into());
    }

    /// Every text on the page, markup stripped, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = String> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(t) => Some(t.content()),
            _ => None,
        })
    }
}

// ============================================================================
// Style
// ============================================================================

/// Font sizes in points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub header1: f64,
    pub header2: f64,
    pub footer: f64,
    pub circle_name: f64,
    pub circle_date: f64,
    pub side_label: f64,
}

impl Default for FontSizes {
    fn default() -> Self {
        FontSizes {
            header1: defaults::HEADER1_SIZE,
            header2: defaults::HEADER2_SIZE,
            footer: defaults::FOOTER_SIZE,
            circle_name: defaults::CIRCLE_NAME_SIZE,
            circle_date: defaults::CIRCLE_DATE_SIZE,
            side_label: defaults::SIDE_LABEL_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub empty: Color,
    pub occupied: Color,
    pub conflict: Color,
    /// Slot outlines, arrows and text.
    pub outline: Color,
}

impl Palette {
    pub fn fill(&self, fill: SlotFill) -> &Color {
        match fill {
            SlotFill::Empty => &self.empty,
            SlotFill::Occupied => &self.occupied,
            SlotFill::Conflict => &self.conflict,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            empty: Color::named(defaults::EMPTY_COLOR),
            occupied: unit_rgb(defaults::OCCUPIED_RGB),
            conflict: Color::named(defaults::CONFLICT_COLOR),
            outline: Color::named(defaults::OUTLINE_COLOR),
        }
    }
}

/// The rack base drawn under the slots.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PolySpec {
    pub bot_left: [f64; 2],
    pub top_left: [f64; 2],
    pub top_right: [f64; 2],
    pub bot_right: [f64; 2],
    pub color: Color,
}

impl Default for PolySpec {
    fn default() -> Self {
        PolySpec {
            bot_left: defaults::POLY_BOT_LEFT,
            top_left: defaults::POLY_TOP_LEFT,
            top_right: defaults::POLY_TOP_RIGHT,
            bot_right: defaults::POLY_BOT_RIGHT,
            color: unit_rgb(defaults::POLY_RGB),
        }
    }
}

/// The rounded foot of the rack.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EllipseSpec {
    pub center: [f64; 2],
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

impl Default for EllipseSpec {
    fn default() -> Self {
        EllipseSpec {
            center: defaults::ELLIPSE_CENTER,
            width: defaults::ELLIPSE_WIDTH,
            height: defaults::ELLIPSE_HEIGHT,
            color: unit_rgb(defaults::ELLIPSE_RGB),
        }
    }
}

/// Fixed wording of the page heading and footer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeaderText {
    pub drawer_label: String,
    pub date_label: String,
    pub path_label: String,
    /// Lines printed right-aligned at the top right, one under the other.
    pub department: Vec<String>,
}

impl Default for HeaderText {
    fn default() -> Self {
        HeaderText {
            drawer_label: defaults::DRAWER_LABEL.to_string(),
            date_label: defaults::DATE_LABEL.to_string(),
            path_label: defaults::PATH_LABEL.to_string(),
            department: Vec::new(),
        }
    }
}

/// Everything about a page that does not depend on the inventory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageStyle {
    pub frame: PageFrame,
    pub poly: PolySpec,
    pub ellipse: EllipseSpec,
    pub fonts: FontSizes,
    pub palette: Palette,
    pub header: HeaderText,
    pub logo_path: Option<String>,
}

/// Per-run values printed on every page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageHeader {
    pub generated_at: NaiveDateTime,
    /// Where the inventory was read from, printed in the footer.
    pub source_label: String,
}

fn unit_rgb([r, g, b]: [f64; 3]) -> Color {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb(channel(r), channel(g), channel(b))
}

fn point([x, y]: [f64; 2]) -> DVec2 {
    dvec2(x, y)
}

// ============================================================================
// Page builder
// ============================================================================

/// Lay out one drawer: heading, rack base, labels, then the slots on top.
pub fn build_page(
    plan: &DrawerPlan,
    letters: &RowLetters,
    layout: &GridLayout,
    style: &PageStyle,
    header: &PageHeader,
) -> Page {
    let mut page = Page::new(plan.drawer);
    let fonts = &style.fonts;
    let ink = &style.palette.outline;

    page.push(Text::with_runs(
        point(defaults::TITLE_AT),
        vec![
            TextRun::bold(&style.header.drawer_label),
            TextRun::plain(format!(" {}", plan.drawer)),
        ],
        fonts.header1,
    ));
    page.push(Text::with_runs(
        point(defaults::TIMESTAMP_AT),
        vec![
            TextRun::bold(&style.header.date_label),
            TextRun::plain(format!(
                ": {}",
                header.generated_at.format(defaults::TIMESTAMP_FORMAT)
            )),
        ],
        fonts.header2,
    ));
    page.push(Text::with_runs(
        point(defaults::FOOTER_AT),
        vec![
            TextRun::bold(&style.header.path_label),
            TextRun::plain(format!(": {}", header.source_label)),
        ],
        fonts.footer,
    ));

    let poly = &style.poly;
    page.push(Polygon {
        points: [poly.bot_left, poly.top_left, poly.top_right, poly.bot_right]
            .into_iter()
            .map(point)
            .collect(),
        fill: poly.color.clone(),
    });
    page.push(Ellipse {
        center: point(style.ellipse.center),
        width: style.ellipse.width,
        height: style.ellipse.height,
        fill: style.ellipse.color.clone(),
        stroke: None,
    });

    // Labels belong to visual positions, so the short row still gets its name.
    let mut labels = Vec::new();
    for row in 0..ROW_COUNT {
        let width = row_width(row);
        for column in 0..width {
            for anchor in layout.label_anchors(row, column, width) {
                if let Some(arrow) = anchor.arrow {
                    page.push(Arrow {
                        from: arrow.from,
                        delta: arrow.delta,
                        color: ink.clone(),
                    });
                }
                let text = match anchor.kind {
                    LabelKind::ColumnNumber(n) => n.to_string(),
                    LabelKind::RowName(row) => format!("{} →", letters.letter(row)),
                };
                labels.push(Text::new(anchor.text_at, text, fonts.side_label));
            }
        }
    }

    for slot in &plan.slots {
        page.push(Ellipse {
            center: slot.center,
            width: layout.diameter,
            height: layout.diameter,
            fill: style.palette.fill(slot.fill).clone(),
            stroke: Some(Stroke {
                color: ink.clone(),
                width: defaults::OUTLINE_WIDTH,
            }),
        });
    }
    for label in labels {
        page.push(label);
    }
    for slot in &plan.slots {
        let Some(text) = &slot.text else { continue };
        page.push(
            Text::new(slot.center + NAME_OFFSET, &text.name, fonts.circle_name)
                .anchored(TextAnchor::Middle),
        );
        if let Some(date) = &text.date {
            page.push(
                Text::new(slot.center + DATE_OFFSET, date, fonts.circle_date)
                    .anchored(TextAnchor::Middle),
            );
        }
    }

    for (i, line) in style.header.department.iter().enumerate() {
        let y = defaults::DEPARTMENT_TOP - i as f64 * defaults::DEPARTMENT_STEP;
        page.push(
            Text::new(dvec2(defaults::DEPARTMENT_X, y), line, fonts.header2)
                .anchored(TextAnchor::End),
        );
    }
    if let Some(href) = &style.logo_path {
        page.push(Image {
            href: href.clone(),
            rect: defaults::LOGO_RECT,
        });
    }
    page
}
