//! Font-size search and centred placement for a single label.
//!
//! The search walks down from `RenderSpec::initial_font_size` one point at
//! a time and takes the first size whose outlined box fits the square
//! canvas. Width is the label's ink extent; height is the font's
//! ascent + descent so every label in a run shares a baseline rule.

use std::fmt;

use crate::color::Rgb;
use crate::face::{LabelFace, LineMetrics};

pub const DEFAULT_CANVAS_SIZE: u32 = 64;
pub const DEFAULT_INITIAL_FONT_SIZE: u32 = 32;

/// Raster parameters shared by every tile in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSpec {
    pub canvas_size: u32,
    pub initial_font_size: u32,
    pub outline_thickness: u32,
    pub text_color: Rgb,
    pub outline_color: Rgb,
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            initial_font_size: DEFAULT_INITIAL_FONT_SIZE,
            outline_thickness: 1,
            text_color: Rgb::BLACK,
            outline_color: Rgb::WHITE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    /// Left ink edge relative to the pen origin.
    pub ink_left: i32,
    pub width: u32,
    pub line: LineMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub font_size: u32,
    pub extent: TextExtent,
    /// Pen origin of the label.
    pub x: f32,
    pub baseline_y: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedCodepoint(char),
    Unmeasurable { font_size: u32 },
    DoesNotFit { canvas_size: u32 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedCodepoint(ch) => write!(
                f,
                "font has no glyph for U+{:04X} ({})",
                *ch as u32,
                ch.escape_default()
            ),
            Self::Unmeasurable { font_size } => {
                write!(f, "no measurable bounding box at font size {font_size}")
            }
            Self::DoesNotFit { canvas_size } => {
                write!(f, "does not fit a {canvas_size}x{canvas_size} canvas at any font size")
            }
        }
    }
}

/// Ink extent of `text` at `font_size`, or `None` when nothing would be drawn.
pub fn measure(face: &dyn LabelFace, text: &str, font_size: u32) -> Option<TextExtent> {
    let line = face.line_metrics(font_size)?;
    let glyphs = face.layout(text, font_size);

    let left = glyphs
        .iter()
        .map(|glyph| glyph.left)
        .fold(f32::INFINITY, f32::min);
    let right = glyphs
        .iter()
        .map(|glyph| glyph.left + glyph.width as f32)
        .fold(f32::NEG_INFINITY, f32::max);
    if !left.is_finite() || !right.is_finite() {
        return None;
    }

    let ink_left = left.floor() as i32;
    let ink_right = right.ceil() as i32;
    Some(TextExtent {
        ink_left,
        width: ink_right.saturating_sub(ink_left).max(0) as u32,
        line,
    })
}

pub fn fit_label(face: &dyn LabelFace, text: &str, spec: &RenderSpec) -> Result<Fit, SkipReason> {
    if let Some(ch) = text
        .chars()
        .find(|ch| !ch.is_whitespace() && !face.has_glyph(*ch))
    {
        return Err(SkipReason::UnsupportedCodepoint(ch));
    }

    let border = 2 * u64::from(spec.outline_thickness);
    let canvas = u64::from(spec.canvas_size);

    for font_size in (1..=spec.initial_font_size).rev() {
        let extent =
            measure(face, text, font_size).ok_or(SkipReason::Unmeasurable { font_size })?;
        let total_width = u64::from(extent.width) + border;
        let total_height = u64::from(extent.line.height()) + border;
        log::debug!(
            "fit '{}' size={} box={}x{} canvas={}",
            text,
            font_size,
            total_width,
            total_height,
            canvas
        );

        if total_width <= canvas && total_height <= canvas {
            let (x, baseline_y) = place(&extent, spec);
            return Ok(Fit {
                font_size,
                extent,
                x,
                baseline_y,
            });
        }
    }

    Err(SkipReason::DoesNotFit {
        canvas_size: spec.canvas_size,
    })
}

/// Centres the outlined box; the vertical coordinate is the baseline.
///
/// The returned x is the pen origin handed to the layout, not the ink edge:
/// `ink_left` is not subtracted, so a face with a positive left bearing draws
/// its ink that many pixels right of the centred box.
fn place(extent: &TextExtent, spec: &RenderSpec) -> (f32, f32) {
    let canvas = spec.canvas_size as f32;
    let thickness = spec.outline_thickness as f32;
    let x = (canvas - extent.width as f32 - 2.0 * thickness) / 2.0 + thickness;
    let top = (canvas - extent.line.height() as f32 - 2.0 * thickness) / 2.0 + thickness;
    (x, top + extent.line.ascent as f32)
}
