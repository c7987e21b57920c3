//! RGBA pixel format with alpha blending.
//!
//! Provides the `PixelFormat` trait and `PixfmtRgba32`, which reads and
//! writes non-premultiplied RGBA32 pixels in a [`RenderingBuffer`].

use crate::basics::CoverType;
use crate::color::Rgba8;
use crate::rendering_buffer::{RenderingBuffer, BPP};

// ============================================================================
// PixelFormat trait
// ============================================================================

/// Trait for pixel formats that can blend colors into a rendering buffer.
///
/// Callers are expected to clip first (see `RendererBase`); implementations
/// index rows directly.
pub trait PixelFormat {
    type ColorType;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Blend a horizontal line of `len` pixels at (x, y) with uniform coverage.
    fn blend_hline(&mut self, x: i32, y: i32, len: u32, c: &Self::ColorType, cover: CoverType);

    /// Blend a horizontal span of `len` pixels with per-pixel coverage values.
    fn blend_solid_hspan(
        &mut self,
        x: i32,
        y: i32,
        len: u32,
        c: &Self::ColorType,
        covers: &[CoverType],
    );

    /// Overwrite a horizontal line of `len` pixels with color `c`.
    fn copy_hline(&mut self, x: i32, y: i32, len: u32, c: &Self::ColorType);

    /// Get the pixel color at (x, y).
    fn pixel(&self, x: i32, y: i32) -> Self::ColorType;
}

// ============================================================================
// PixfmtRgba32
// ============================================================================

/// Pixel format for non-premultiplied RGBA32 (R, G, B, A byte order).
pub struct PixfmtRgba32<'a> {
    rbuf: &'a mut RenderingBuffer,
}

impl<'a> PixfmtRgba32<'a> {
    pub fn new(rbuf: &'a mut RenderingBuffer) -> Self {
        Self { rbuf }
    }

    /// Blend one pixel; `alpha` already includes coverage.
    #[inline]
    fn blend_pix(p: &mut [u8], c: &Rgba8, alpha: u8) {
        if alpha == 255 {
            p[0] = c.r;
            p[1] = c.g;
            p[2] = c.b;
            p[3] = 255;
        } else {
            p[0] = Rgba8::lerp(p[0], c.r, alpha);
            p[1] = Rgba8::lerp(p[1], c.g, alpha);
            p[2] = Rgba8::lerp(p[2], c.b, alpha);
            p[3] = Rgba8::lerp(p[3], 255, alpha);
        }
    }

    #[inline]
    fn span_mut(&mut self, x: i32, y: i32, len: u32) -> &mut [u8] {
        let start = x as usize * BPP;
        &mut self.rbuf.row_slice_mut(y as u32)[start..start + len as usize * BPP]
    }
}

impl<'a> PixelFormat for PixfmtRgba32<'a> {
    type ColorType = Rgba8;

    fn width(&self) -> u32 {
        self.rbuf.width()
    }

    fn height(&self) -> u32 {
        self.rbuf.height()
    }

    fn pixel(&self, x: i32, y: i32) -> Rgba8 {
        let off = x as usize * BPP;
        let p = &self.rbuf.row_slice(y as u32)[off..off + BPP];
        Rgba8::new(p[0], p[1], p[2], p[3])
    }

    fn copy_hline(&mut self, x: i32, y: i32, len: u32, c: &Rgba8) {
        for p in self.span_mut(x, y, len).chunks_exact_mut(BPP) {
            p.copy_from_slice(&[c.r, c.g, c.b, c.a]);
        }
    }

    fn blend_hline(&mut self, x: i32, y: i32, len: u32, c: &Rgba8, cover: CoverType) {
        let alpha = Rgba8::mult_cover(c.a, cover);
        if alpha == 0 {
            return;
        }
        for p in self.span_mut(x, y, len).chunks_exact_mut(BPP) {
            Self::blend_pix(p, c, alpha);
        }
    }

    fn blend_solid_hspan(&mut self, x: i32, y: i32, len: u32, c: &Rgba8, covers: &[CoverType]) {
        for (p, &cov) in self
            .span_mut(x, y, len)
            .chunks_exact_mut(BPP)
            .zip(covers.iter())
        {
            let alpha = Rgba8::mult_cover(c.a, cov);
            if alpha > 0 {
                Self::blend_pix(p, c, alpha);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let mut rb = RenderingBuffer::new(100, 50);
        let pf = PixfmtRgba32::new(&mut rb);
        assert_eq!(pf.width(), 100);
        assert_eq!(pf.height(), 50);
    }

    #[test]
    fn test_copy_hline() {
        let mut rb = RenderingBuffer::new(20, 10);
        let mut pf = PixfmtRgba32::new(&mut rb);
        let green = Rgba8::rgb(0, 255, 0);
        pf.copy_hline(5, 3, 10, &green);
        for x in 5..15 {
            assert_eq!(pf.pixel(x, 3), green);
        }
        assert_eq!(pf.pixel(4, 3), Rgba8::default());
        assert_eq!(pf.pixel(15, 3), Rgba8::default());
    }

    #[test]
    fn test_blend_hline_opaque_overwrites() {
        let mut rb = RenderingBuffer::new(20, 10);
        let mut pf = PixfmtRgba32::new(&mut rb);
        let red = Rgba8::rgb(255, 0, 0);
        pf.blend_hline(5, 3, 5, &red, 255);
        for x in 5..10 {
            assert_eq!(pf.pixel(x, 3), red);
        }
    }

    #[test]
    fn test_blend_semi_transparent_over_white() {
        let mut rb = RenderingBuffer::new(4, 4);
        let mut pf = PixfmtRgba32::new(&mut rb);
        pf.copy_hline(0, 0, 4, &Rgba8::WHITE);
        let red = Rgba8::rgb(255, 0, 0).with_opacity(0.5);
        pf.blend_hline(0, 0, 1, &red, 255);
        let p = pf.pixel(0, 0);
        assert_eq!(p.r, 255);
        assert!((p.g as i32 - 127).abs() <= 2);
        assert_eq!(p.a, 255);
    }

    #[test]
    fn test_blend_solid_hspan_per_pixel_coverage() {
        let mut rb = RenderingBuffer::new(20, 10);
        let mut pf = PixfmtRgba32::new(&mut rb);
        let green = Rgba8::rgb(0, 255, 0);
        let covers = [255u8, 128, 64, 0, 255];
        pf.blend_solid_hspan(5, 3, 5, &green, &covers);
        assert_eq!(pf.pixel(5, 3).g, 255);
        assert!((pf.pixel(6, 3).g as i32 - 128).abs() <= 1);
        assert!(pf.pixel(7, 3).g < pf.pixel(6, 3).g);
        assert_eq!(pf.pixel(8, 3), Rgba8::default());
        assert_eq!(pf.pixel(9, 3).g, 255);
    }

    #[test]
    fn test_later_blend_occludes_earlier() {
        let mut rb = RenderingBuffer::new(2, 1);
        let mut pf = PixfmtRgba32::new(&mut rb);
        pf.blend_hline(0, 0, 2, &Rgba8::rgb(255, 0, 0), 255);
        pf.blend_hline(0, 0, 1, &Rgba8::rgb(0, 0, 255), 255);
        assert_eq!(pf.pixel(0, 0), Rgba8::rgb(0, 0, 255));
        assert_eq!(pf.pixel(1, 0), Rgba8::rgb(255, 0, 0));
    }
}
