//! TrueType overlay text using `ttf-parser`.
//!
//! Glyph outlines are scaled to the requested em height, flipped into the
//! y-down canvas space and fed straight into the anti-aliased rasterizer.
//! Quadratic and cubic segments are flattened into line segments on the way.

use crate::basics::uround;
use crate::error::{Error, Result};
use crate::rasterizer_scanline_aa::RasterizerScanlineAa;
use std::path::Path;

/// A loaded font face with a pixel size.
pub struct FontEngine {
    face_data: Vec<u8>,
    face_index: u32,
    height: f64,
}

impl FontEngine {
    /// Create a font engine from raw TTF/OTF data.
    ///
    /// `face_index` selects the face in a font collection (use 0 for single fonts).
    pub fn from_data(data: Vec<u8>, face_index: u32) -> Result<Self> {
        ttf_parser::Face::parse(&data, face_index)
            .map_err(|e| Error::Font(format!("failed to parse font: {}", e)))?;
        Ok(Self {
            face_data: data,
            face_index,
            height: 12.0,
        })
    }

    /// Read a font file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        log::debug!("loaded font {} ({} bytes)", path.display(), data.len());
        Self::from_data(data, 0)
    }

    /// Set the em height in pixels.
    pub fn set_height(&mut self, h: f64) {
        self.height = h;
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Add the outlines of `text` to `ras`, with the top of the ascender at
    /// `top` and the pen starting at `x`. Returns the pen position after the
    /// last glyph. Characters missing from the font are skipped.
    pub fn add_text(
        &self,
        ras: &mut RasterizerScanlineAa,
        x: f64,
        top: f64,
        text: &str,
    ) -> Result<f64> {
        let face = self.face()?;
        let scale = self.scale(&face);
        let baseline = top + face.ascender() as f64 * scale;

        let mut pen = x;
        for ch in text.chars() {
            let Some(glyph) = face.glyph_index(ch) else {
                continue;
            };
            let mut sink = RasterSink::new(&mut *ras, scale, pen, baseline);
            face.outline_glyph(glyph, &mut sink);
            sink.finish();
            pen += face
                .glyph_hor_advance(glyph)
                .map(|a| a as f64 * scale)
                .unwrap_or(0.0);
        }
        Ok(pen)
    }

    fn face(&self) -> Result<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.face_data, self.face_index)
            .map_err(|e| Error::Font(format!("failed to parse font: {}", e)))
    }

    fn scale(&self, face: &ttf_parser::Face<'_>) -> f64 {
        self.height / face.units_per_em() as f64
    }
}

// ============================================================================
// RasterSink
// ============================================================================

/// Receives glyph outline commands and forwards them to the rasterizer in
/// canvas coordinates.
struct RasterSink<'a> {
    ras: &'a mut RasterizerScanlineAa,
    scale: f64,
    origin_x: f64,
    baseline: f64,
    last: (f64, f64),
}

impl<'a> RasterSink<'a> {
    fn new(ras: &'a mut RasterizerScanlineAa, scale: f64, origin_x: f64, baseline: f64) -> Self {
        Self {
            ras,
            scale,
            origin_x,
            baseline,
            last: (0.0, 0.0),
        }
    }

    #[inline]
    fn map(&self, x: f32, y: f32) -> (f64, f64) {
        (
            self.origin_x + x as f64 * self.scale,
            self.baseline - y as f64 * self.scale,
        )
    }

    fn line(&mut self, p: (f64, f64)) {
        self.ras.line_to_d(p.0, p.1);
        self.last = p;
    }

    /// Step count for a curve whose control polygon has length `len`.
    fn num_steps(len: f64) -> u32 {
        uround(len * 0.25).max(4)
    }

    fn finish(&mut self) {
        self.ras.close_polygon();
    }
}

impl ttf_parser::OutlineBuilder for RasterSink<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.ras.move_to_d(p.0, p.1);
        self.last = p;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.map(x, y);
        self.line(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let p0 = self.last;
        let c = self.map(x1, y1);
        let p1 = self.map(x, y);
        let len = (c.0 - p0.0).hypot(c.1 - p0.1) + (p1.0 - c.0).hypot(p1.1 - c.1);
        let n = Self::num_steps(len);
        for i in 1..=n {
            let t = i as f64 / n as f64;
            let u = 1.0 - t;
            self.line((
                u * u * p0.0 + 2.0 * u * t * c.0 + t * t * p1.0,
                u * u * p0.1 + 2.0 * u * t * c.1 + t * t * p1.1,
            ));
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let p0 = self.last;
        let c1 = self.map(x1, y1);
        let c2 = self.map(x2, y2);
        let p1 = self.map(x, y);
        let len = (c1.0 - p0.0).hypot(c1.1 - p0.1)
            + (c2.0 - c1.0).hypot(c2.1 - c1.1)
            + (p1.0 - c2.0).hypot(p1.1 - c2.1);
        let n = Self::num_steps(len);
        for i in 1..=n {
            let t = i as f64 / n as f64;
            let u = 1.0 - t;
            let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
            self.line((
                a * p0.0 + b * c1.0 + c * c2.0 + d * p1.0,
                a * p0.1 + b * c1.1 + c * c2.1 + d * p1.1,
            ));
        }
    }

    fn close(&mut self) {
        self.ras.close_polygon();
    }
}

// ============================================================================
// Tests
// ============================================================================
