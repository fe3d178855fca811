//! SVG generation

use std::borrow::Cow;
use std::fmt::{self, Write};

use glam::DVec2;
use serde::Deserialize;

use super::Page;
use super::defaults;
use super::shapes::Draw;

/// Maps axes units onto the page.
///
/// The page is `width` x `height` inches at `dpi` pixels per inch. The axes
/// rectangle `[left, bottom, width, height]` is given in figure fractions, so
/// axes point `(0, 0)` lands at its bottom-left corner. SVG's y axis points
/// down, axes y points up.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageFrame {
    pub width: f64,
    pub height: f64,
    pub axes: [f64; 4],
    pub dpi: f64,
}

impl Default for PageFrame {
    fn default() -> Self {
        PageFrame {
            width: defaults::PAGE_WIDTH,
            height: defaults::PAGE_HEIGHT,
            axes: defaults::AXES,
            dpi: defaults::DPI,
        }
    }
}

impl PageFrame {
    pub fn width_px(&self) -> f64 {
        self.width * self.dpi
    }

    pub fn height_px(&self) -> f64 {
        self.height * self.dpi
    }

    /// Size of one axes unit in pixels, per axis.
    pub fn axes_scale(&self) -> DVec2 {
        DVec2::new(self.axes[2] * self.width_px(), self.axes[3] * self.height_px())
    }

    /// Axes point to page pixels.
    pub fn to_px(&self, p: DVec2) -> DVec2 {
        self.figure_to_px(DVec2::new(
            self.axes[0] + p.x * self.axes[2],
            self.axes[1] + p.y * self.axes[3],
        ))
    }

    /// Figure fraction point to page pixels.
    pub fn figure_to_px(&self, p: DVec2) -> DVec2 {
        DVec2::new(p.x * self.width_px(), (1.0 - p.y) * self.height_px())
    }

    /// Font points (and stroke widths given in points) to pixels.
    pub fn pt_to_px(&self, pt: f64) -> f64 {
        pt * self.dpi / 72.0
    }
}

/// Serialize a page.
pub fn to_svg(page: &Page, frame: &PageFrame) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_svg(page, frame, &mut out);
    out
}

fn write_svg(page: &Page, frame: &PageFrame, out: &mut String) -> fmt::Result {
    let w = fmt_num(frame.width_px());
    let h = fmt_num(frame.height_px());
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="DejaVu Sans, Arial, sans-serif">"#
    )?;
    writeln!(out, r#"<rect x="0" y="0" width="{w}" height="{h}" fill="white"/>"#)?;
    for primitive in &page.primitives {
        primitive.write_svg(frame, out)?;
    }
    out.push_str("</svg>\n");
    Ok(())
}

/// Format a coordinate with at most 6 significant figures, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (5 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", value, prec = decimals);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Escape text content and attribute values.
pub(crate) fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
