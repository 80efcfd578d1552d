use std::io::Cursor;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::color::Rgb;
use crate::face::{GlyphMask, LabelFace};
use crate::fitter::{Fit, RenderSpec};

/// A finished tile: transparent square canvas with the outlined label.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pixmap: Pixmap,
}

impl RenderedImage {
    pub fn size(&self) -> u32 {
        self.pixmap.width()
    }

    /// Straight (non-premultiplied) RGBA at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.pixmap.width(), self.pixmap.height(), |x, y| {
            Rgba(self.pixel(x, y).unwrap_or([0, 0, 0, 0]))
        })
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.to_rgba_image()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .context("failed to encode tile as png")?;
        Ok(bytes)
    }
}

/// Draws `text` at the fitted size: the outline is the label stamped at every
/// offset in a `(2t+1)^2` square except the centre, then the fill on top.
pub fn render_label(
    face: &dyn LabelFace,
    text: &str,
    fit: &Fit,
    spec: &RenderSpec,
) -> Result<RenderedImage> {
    let mut pixmap = Pixmap::new(spec.canvas_size, spec.canvas_size).with_context(|| {
        format!(
            "failed to create {}x{} canvas",
            spec.canvas_size, spec.canvas_size
        )
    })?;
    let glyphs = face.layout(text, fit.font_size);

    let radius = spec.outline_thickness as i32;
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            if dx == 0 && dy == 0 {
                continue;
            }
            stamp(
                &mut pixmap,
                &glyphs,
                fit.x + dx as f32,
                fit.baseline_y + dy as f32,
                spec.outline_color,
            );
        }
    }
    stamp(&mut pixmap, &glyphs, fit.x, fit.baseline_y, spec.text_color);

    Ok(RenderedImage { pixmap })
}

fn stamp(pixmap: &mut Pixmap, glyphs: &[GlyphMask], x: f32, baseline_y: f32, color: Rgb) {
    let width = pixmap.width() as i32;
    let height = pixmap.height() as i32;
    let pixels = pixmap.pixels_mut();

    for glyph in glyphs {
        let origin_x = (x + glyph.left).round() as i32;
        let origin_y = (baseline_y + glyph.top).round() as i32;

        for row in 0..glyph.height {
            let py = origin_y + row as i32;
            if py < 0 || py >= height {
                continue;
            }
            for col in 0..glyph.width {
                let px = origin_x + col as i32;
                if px < 0 || px >= width {
                    continue;
                }
                let coverage = glyph.coverage[row * glyph.width + col];
                if coverage == 0 {
                    continue;
                }
                let idx = (py * width + px) as usize;
                pixels[idx] = blend_over(pixels[idx], color, coverage);
            }
        }
    }
}

/// Source-over of an opaque colour masked by `coverage`, in premultiplied space.
fn blend_over(dst: PremultipliedColorU8, color: Rgb, coverage: u8) -> PremultipliedColorU8 {
    let alpha = u16::from(coverage);
    let inv_alpha = 255 - alpha;
    let mix = |src: u8, under: u8| {
        ((u16::from(src) * alpha + u16::from(under) * inv_alpha + 127) / 255) as u8
    };

    PremultipliedColorU8::from_rgba(
        mix(color.r, dst.red()),
        mix(color.g, dst.green()),
        mix(color.b, dst.blue()),
        mix(255, dst.alpha()),
    )
    .unwrap_or(dst)
}
