//! Drawing primitives
//!
//! Each primitive is its own type positioned in axes units (images excepted,
//! which sit in figure fractions like the logo axes they stand for) and knows
//! how to write itself as SVG through a [`PageFrame`].

use std::fmt::{self, Write};

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};

use super::defaults;
use super::svg::{PageFrame, escape, fmt_num};
use crate::types::Color;

/// Common behavior for all primitives
#[enum_dispatch]
pub trait Draw {
    /// Append this primitive's SVG element(s) to `out`.
    fn write_svg(&self, frame: &PageFrame, out: &mut String) -> fmt::Result;
}

/// Any primitive a page can hold, in paint order.
#[enum_dispatch(Draw)]
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Ellipse,
    Polygon,
    Text,
    Arrow,
    Image,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    /// Width in points.
    pub width: f64,
}

/// A filled ellipse; slots are ellipses of equal axes-unit width and height.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub center: DVec2,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub stroke: Option<Stroke>,
}

impl Draw for Ellipse {
    fn write_svg(&self, frame: &PageFrame, out: &mut String) -> fmt::Result {
        let c = frame.to_px(self.center);
        let r = frame.axes_scale() * dvec2(self.width, self.height) / 2.0;
        write!(
            out,
            r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="{}""#,
            fmt_num(c.x),
            fmt_num(c.y),
            fmt_num(r.x),
            fmt_num(r.y),
            self.fill
        )?;
        write_stroke(self.stroke.as_ref(), frame, out)?;
        writeln!(out, "/>")
    }
}

/// A closed, filled polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<DVec2>,
    pub fill: Color,
}

impl Draw for Polygon {
    fn write_svg(&self, frame: &PageFrame, out: &mut String) -> fmt::Result {
        out.push_str(r#"<polygon points=""#);
        for (i, p) in self.points.iter().enumerate() {
            let p = frame.to_px(*p);
            if i > 0 {
                out.push(' ');
            }
            write!(out, "{},{}", fmt_num(p.x), fmt_num(p.y))?;
        }
        writeln!(out, r#"" fill="{}"/>"#, self.fill)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_svg(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// A piece of text with its own weight, as in "**Drawer** 3".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        TextRun {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        TextRun {
            text: text.into(),
            bold: true,
        }
    }
}

/// Text whose baseline starts (or centres, or ends) at `at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub at: DVec2,
    pub runs: Vec<TextRun>,
    /// Font size in points.
    pub size: f64,
    pub anchor: TextAnchor,
}

impl Text {
    pub fn new(at: DVec2, text: impl Into<String>, size: f64) -> Self {
        Text {
            at,
            runs: vec![TextRun::plain(text)],
            size,
            anchor: TextAnchor::Start,
        }
    }

    pub fn with_runs(at: DVec2, runs: Vec<TextRun>, size: f64) -> Self {
        Text {
            at,
            runs,
            size,
            anchor: TextAnchor::Start,
        }
    }

    pub fn anchored(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// The text without markup.
    pub fn content(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

impl Draw for Text {
    fn write_svg(&self, frame: &PageFrame, out: &mut String) -> fmt::Result {
        let p = frame.to_px(self.at);
        write!(
            out,
            r#"<text x="{}" y="{}" font-size="{}""#,
            fmt_num(p.x),
            fmt_num(p.y),
            fmt_num(frame.pt_to_px(self.size))
        )?;
        if self.anchor != TextAnchor::Start {
            write!(out, r#" text-anchor="{}""#, self.anchor.as_svg())?;
        }
        out.push('>');
        for run in &self.runs {
            if run.bold {
                write!(out, r#"<tspan font-weight="bold">{}</tspan>"#, escape(&run.text))?;
            } else {
                out.push_str(&escape(&run.text));
            }
        }
        writeln!(out, "</text>")
    }
}

/// A straight arrow from `from` to `from + delta`, head at the far end.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub from: DVec2,
    pub delta: DVec2,
    pub color: Color,
}

impl Draw for Arrow {
    fn write_svg(&self, frame: &PageFrame, out: &mut String) -> fmt::Result {
        let start = frame.to_px(self.from);
        let end = frame.to_px(self.from + self.delta);
        writeln!(
            out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            fmt_num(start.x),
            fmt_num(start.y),
            fmt_num(end.x),
            fmt_num(end.y),
            self.color,
            fmt_num(frame.pt_to_px(defaults::ARROW_WIDTH))
        )?;

        let along = end - start;
        let len = along.length();
        if len < 0.001 {
            return Ok(());
        }
        let unit = along / len;
        let perp = dvec2(-unit.y, unit.x);
        let base = end - unit * frame.pt_to_px(defaults::ARROW_HEAD_LEN);
        let half = frame.pt_to_px(defaults::ARROW_HEAD_WIDTH) / 2.0;
        let (p1, p2) = (base + perp * half, base - perp * half);
        writeln!(
            out,
            r#"<polygon points="{},{} {},{} {},{}" fill="{}"/>"#,
            fmt_num(end.x),
            fmt_num(end.y),
            fmt_num(p1.x),
            fmt_num(p1.y),
            fmt_num(p2.x),
            fmt_num(p2.y),
            self.color
        )
    }
}

/// An external raster placed in a figure-fraction rectangle
/// `[left, bottom, width, height]`, aspect ratio preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub href: String,
    pub rect: [f64; 4],
}

impl Draw for Image {
    fn write_svg(&self, frame: &PageFrame, out: &mut String) -> fmt::Result {
        let [left, bottom, width, height] = self.rect;
        let top_left = frame.figure_to_px(dvec2(left, bottom + height));
        writeln!(
            out,
            r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet" xlink:href="{}"/>"#,
            fmt_num(top_left.x),
            fmt_num(top_left.y),
            fmt_num(width * frame.width_px()),
            fmt_num(height * frame.height_px()),
            escape(&self.href)
        )
    }
}

fn write_stroke(stroke: Option<&Stroke>, frame: &PageFrame, out: &mut String) -> fmt::Result {
    match stroke {
        Some(s) => write!(
            out,
            r#" stroke="{}" stroke-width="{}""#,
            s.color,
            fmt_num(frame.pt_to_px(s.width))
        ),
        None => Ok(()),
    }
}
