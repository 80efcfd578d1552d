use std::path::Path;

use anyhow::{anyhow, Result};
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::{Font, FontSettings};

use crate::error_codes::{CodedError, FONT_UNREADABLE};
use crate::font_locator::read_font_bytes;

/// Whole-pixel vertical extents of a line, both measured away from the
/// baseline (descent is positive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMetrics {
    pub ascent: u32,
    pub descent: u32,
}

impl LineMetrics {
    pub fn height(self) -> u32 {
        self.ascent + self.descent
    }
}

/// Coverage bitmap of one glyph placed on a line.
///
/// `left` is relative to the pen origin, `top` to the baseline (negative
/// above it).
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    pub left: f32,
    pub top: f32,
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<u8>,
}

/// A scalable font as seen by the label fitter and renderer.
pub trait LabelFace {
    fn line_metrics(&self, font_size: u32) -> Option<LineMetrics>;

    /// Glyphs with visible area, in drawing order. Blank glyphs are omitted.
    fn layout(&self, text: &str, font_size: u32) -> Vec<GlyphMask>;

    fn has_glyph(&self, ch: char) -> bool;
}

pub struct FontdueFace {
    font: Font,
}

impl FontdueFace {
    pub fn load(path: &Path, expected_sha256: Option<&str>) -> Result<Self> {
        let bytes = read_font_bytes(path, expected_sha256)?;
        Self::from_bytes(bytes).map_err(|error| {
            anyhow!(CodedError::resource(
                FONT_UNREADABLE,
                format!("failed to parse font {}: {error:#}", path.display()),
            ))
        })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|error| anyhow!("failed to parse font: {error}"))?;
        Ok(Self { font })
    }

    pub fn name(&self) -> Option<&str> {
        self.font.name()
    }
}

impl LabelFace for FontdueFace {
    fn line_metrics(&self, font_size: u32) -> Option<LineMetrics> {
        let metrics = self.font.horizontal_line_metrics(font_size as f32)?;
        Some(LineMetrics {
            ascent: metrics.ascent.ceil().max(0.0) as u32,
            descent: (-metrics.descent).ceil().max(0.0) as u32,
        })
    }

    fn layout(&self, text: &str, font_size: u32) -> Vec<GlyphMask> {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x: 0.0,
            y: 0.0,
            max_width: None,
            max_height: None,
            horizontal_align: fontdue::layout::HorizontalAlign::Left,
            vertical_align: fontdue::layout::VerticalAlign::Top,
            line_height: 1.0,
            wrap_style: fontdue::layout::WrapStyle::Letter,
            wrap_hard_breaks: false,
        });
        layout.append(&[&self.font], &TextStyle::new(text, font_size as f32, 0));

        layout
            .glyphs()
            .iter()
            .filter(|glyph| glyph.width > 0 && glyph.height > 0)
            .map(|glyph| {
                let (metrics, coverage) = self.font.rasterize_config(glyph.key);
                GlyphMask {
                    left: glyph.x,
                    top: -(metrics.ymin as f32 + metrics.height as f32),
                    width: metrics.width,
                    height: metrics.height,
                    coverage,
                }
            })
            .collect()
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.font.lookup_glyph_index(ch) != 0
    }
}

/// Monospace face made of solid rectangles with exact integer metrics.
///
/// Every non-space character is `font_size / 2` wide and fills the
/// ascent; ascent is three quarters of the size, descent one quarter.
/// Characters in `missing` report no glyph.
#[derive(Debug, Clone, Default)]
pub struct BlockFace {
    pub missing: Vec<char>,
}

impl BlockFace {
    pub fn advance(font_size: u32) -> u32 {
        font_size / 2
    }
}

impl LabelFace for BlockFace {
    fn line_metrics(&self, font_size: u32) -> Option<LineMetrics> {
        Some(LineMetrics {
            ascent: font_size * 3 / 4,
            descent: font_size / 4,
        })
    }

    fn layout(&self, text: &str, font_size: u32) -> Vec<GlyphMask> {
        let advance = Self::advance(font_size);
        let ascent = font_size * 3 / 4;
        text.chars()
            .enumerate()
            .filter(|(_, ch)| !ch.is_whitespace())
            .filter(|_| advance > 0 && ascent > 0)
            .map(|(index, _)| GlyphMask {
                left: (index as u32 * advance) as f32,
                top: -(ascent as f32),
                width: advance as usize,
                height: ascent as usize,
                coverage: vec![255; (advance * ascent) as usize],
            })
            .collect()
    }

    fn has_glyph(&self, ch: char) -> bool {
        !self.missing.contains(&ch)
    }
}
