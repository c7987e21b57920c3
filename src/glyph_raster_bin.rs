//! Binary raster glyph generator.
//!
//! Expands glyphs of a [`RasterFont`] into rows of 0/255 coverage, scaled by
//! an integer factor so the 5×7 cell stays crisp at poster sizes.

use crate::basics::{CoverType, COVER_FULL};
use crate::raster_font::RasterFont;

/// Glyph used for characters the font does not cover.
const REPLACEMENT: char = '?';

/// Pixel bounds and advance of a prepared glyph. Bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlyphRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub dx: f64,
}

/// Scaled binary glyph generator.
pub struct GlyphRasterBin<'a> {
    font: &'a RasterFont,
    scale: u32,
    span: Vec<CoverType>,
    rows: Option<&'static [u8; 8]>,
}

impl<'a> GlyphRasterBin<'a> {
    /// A generator for `font` at `scale` pixels per font pixel (minimum 1).
    pub fn new(font: &'a RasterFont, scale: u32) -> Self {
        let scale = scale.max(1);
        Self {
            font,
            scale,
            span: vec![0; (font.width * scale) as usize],
            rows: None,
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Scaled cell height in pixels.
    pub fn height(&self) -> f64 {
        (self.font.height * self.scale) as f64
    }

    /// Distance from the top of the cell to the bottom of the baseline row.
    pub fn base_line(&self) -> f64 {
        ((self.font.baseline + 1) * self.scale) as f64
    }

    /// Horizontal advance of `s` in pixels.
    pub fn width(&self, s: &str) -> f64 {
        (s.chars().count() as u32 * self.font.advance * self.scale) as f64
    }

    /// Prepare `ch` with its baseline row ending at pixel row `y`.
    pub fn prepare(&mut self, r: &mut GlyphRect, x: f64, y: f64, ch: char) {
        self.rows = self
            .font
            .glyph(ch)
            .or_else(|| self.font.glyph(REPLACEMENT));

        let s = self.scale as i32;
        r.x1 = x as i32;
        r.x2 = r.x1 + (self.font.width * self.scale) as i32 - 1;
        r.y1 = y as i32 - (self.font.baseline as i32 + 1) * s + 1;
        r.y2 = r.y1 + (self.font.height * self.scale) as i32 - 1;
        r.dx = (self.font.advance * self.scale) as f64;
        if self.rows.is_none() {
            r.x2 = r.x1 - 1;
        }
    }

    /// Coverage for pixel row `i` of the prepared glyph (0 = top).
    pub fn span(&mut self, i: u32) -> &[CoverType] {
        let Some(rows) = self.rows else {
            return &self.span[..0];
        };
        let bits = rows.get((i / self.scale) as usize).copied().unwrap_or(0);
        let w = self.font.width;
        for (j, c) in self.span.iter_mut().enumerate() {
            let col = j as u32 / self.scale;
            let on = (bits >> (w - 1 - col)) & 1 != 0;
            *c = if on { COVER_FULL } else { 0 };
        }
        &self.span
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster_font::FONT_5X7;

    #[test]
    fn test_metrics_scale() {
        let g = GlyphRasterBin::new(&FONT_5X7, 3);
        assert_eq!(g.height(), 24.0);
        assert_eq!(g.base_line(), 21.0);
        assert_eq!(g.width("ab"), 36.0);
    }

    #[test]
    fn test_zero_scale_is_clamped() {
        let g = GlyphRasterBin::new(&FONT_5X7, 0);
        assert_eq!(g.scale(), 1);
    }

    #[test]
    fn test_prepare_rect() {
        let mut g = GlyphRasterBin::new(&FONT_5X7, 2);
        let mut r = GlyphRect::default();
        g.prepare(&mut r, 10.0, 20.0, 'A');
        assert_eq!((r.x1, r.x2), (10, 19));
        // Baseline row (6) occupies rows 19..=20.
        assert_eq!(r.y1, 20 - 14 + 1);
        assert_eq!(r.y2, r.y1 + 15);
        assert_eq!(r.dx, 12.0);
    }

    #[test]
    fn test_span_unscaled() {
        let mut g = GlyphRasterBin::new(&FONT_5X7, 1);
        let mut r = GlyphRect::default();
        g.prepare(&mut r, 0.0, 0.0, 'T');
        assert_eq!(g.span(0), &[255, 255, 255, 255, 255]);
        assert_eq!(g.span(1), &[0, 0, 255, 0, 0]);
        assert_eq!(g.span(7), &[0; 5]);
    }

    #[test]
    fn test_span_scaled_duplicates_pixels() {
        let mut g = GlyphRasterBin::new(&FONT_5X7, 2);
        let mut r = GlyphRect::default();
        g.prepare(&mut r, 0.0, 0.0, 'T');
        let expected = [0, 0, 0, 0, 255, 255, 0, 0, 0, 0];
        assert_eq!(g.span(2), &expected);
        assert_eq!(g.span(3), &expected);
    }

    #[test]
    fn test_unknown_char_uses_replacement() {
        let mut g = GlyphRasterBin::new(&FONT_5X7, 1);
        let mut r = GlyphRect::default();
        g.prepare(&mut r, 0.0, 0.0, '\u{2603}');
        let unknown: Vec<u8> = (0..8).flat_map(|i| g.span(i).to_vec()).collect();
        g.prepare(&mut r, 0.0, 0.0, '?');
        let question: Vec<u8> = (0..8).flat_map(|i| g.span(i).to_vec()).collect();
        assert_eq!(unknown, question);
        assert!(r.x2 >= r.x1);
    }
}
