//! Base renderer with clipping.
//!
//! Wraps a pixel format with a clip rectangle so that every span handed
//! down from the scanline renderers or the text renderer is bounded to the
//! visible canvas. Blobs whose centers sit near an edge routinely produce
//! spans that start left of zero or run past the right border.

use crate::basics::CoverType;
use crate::pixfmt_rgba::PixelFormat;

/// Inclusive integer clip rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// Base renderer that clips all operations before delegating to the
/// underlying pixel format.
pub struct RendererBase<PF: PixelFormat> {
    ren: PF,
    clip_box: ClipBox,
}

impl<PF: PixelFormat> RendererBase<PF> {
    /// Create a renderer whose clip box covers the full buffer.
    pub fn new(ren: PF) -> Self {
        let clip_box = ClipBox {
            x1: 0,
            y1: 0,
            x2: ren.width() as i32 - 1,
            y2: ren.height() as i32 - 1,
        };
        Self { ren, clip_box }
    }

    pub fn width(&self) -> u32 {
        self.ren.width()
    }

    pub fn height(&self) -> u32 {
        self.ren.height()
    }

    pub fn clip_box(&self) -> &ClipBox {
        &self.clip_box
    }

    #[cfg(test)]
    fn inbox(&self, x: i32, y: i32) -> bool {
        x >= self.clip_box.x1
            && y >= self.clip_box.y1
            && x <= self.clip_box.x2
            && y <= self.clip_box.y2
    }

    /// Fill the whole buffer with `c`, ignoring blending.
    pub fn clear(&mut self, c: &PF::ColorType) {
        let w = self.ren.width();
        if w > 0 {
            for y in 0..self.ren.height() as i32 {
                self.ren.copy_hline(0, y, w, c);
            }
        }
    }

    /// Get the pixel at (x, y), or the default color outside the clip box.
    #[cfg(test)]
    pub(crate) fn pixel(&self, x: i32, y: i32) -> PF::ColorType
    where
        PF::ColorType: Default,
    {
        if self.inbox(x, y) {
            self.ren.pixel(x, y)
        } else {
            PF::ColorType::default()
        }
    }

    /// Blend a horizontal line; `x1` and `x2` are inclusive and may be unordered.
    pub fn blend_hline(
        &mut self,
        mut x1: i32,
        y: i32,
        mut x2: i32,
        c: &PF::ColorType,
        cover: CoverType,
    ) {
        if x1 > x2 {
            std::mem::swap(&mut x1, &mut x2);
        }
        let cb = self.clip_box;
        if y > cb.y2 || y < cb.y1 || x1 > cb.x2 || x2 < cb.x1 {
            return;
        }
        x1 = x1.max(cb.x1);
        x2 = x2.min(cb.x2);
        self.ren.blend_hline(x1, y, (x2 - x1 + 1) as u32, c, cover);
    }

    /// Blend a span with per-pixel coverage, trimming `covers` to the clip box.
    pub fn blend_solid_hspan(
        &mut self,
        mut x: i32,
        y: i32,
        mut len: i32,
        c: &PF::ColorType,
        covers: &[CoverType],
    ) {
        let cb = self.clip_box;
        if y > cb.y2 || y < cb.y1 {
            return;
        }
        let mut offset = 0usize;
        if x < cb.x1 {
            let d = cb.x1 - x;
            len -= d;
            if len <= 0 {
                return;
            }
            offset = d as usize;
            x = cb.x1;
        }
        if x + len > cb.x2 + 1 {
            len = cb.x2 - x + 1;
            if len <= 0 {
                return;
            }
        }
        self.ren
            .blend_solid_hspan(x, y, len as u32, c, &covers[offset..offset + len as usize]);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba8;
    use crate::pixfmt_rgba::PixfmtRgba32;
    use crate::rendering_buffer::RenderingBuffer;

    #[test]
    fn test_clip_box_matches_buffer() {
        let mut rb = RenderingBuffer::new(30, 20);
        let ren = RendererBase::new(PixfmtRgba32::new(&mut rb));
        assert_eq!(
            *ren.clip_box(),
            ClipBox {
                x1: 0,
                y1: 0,
                x2: 29,
                y2: 19
            }
        );
        assert!(ren.inbox(0, 0));
        assert!(ren.inbox(29, 19));
        assert!(!ren.inbox(30, 0));
        assert!(!ren.inbox(-1, 5));
    }

    #[test]
    fn test_clear_and_pixel() {
        let mut rb = RenderingBuffer::new(8, 8);
        let mut ren = RendererBase::new(PixfmtRgba32::new(&mut rb));
        ren.clear(&Rgba8::WHITE);
        assert_eq!(ren.pixel(7, 7), Rgba8::WHITE);
        assert_eq!(ren.pixel(8, 0), Rgba8::default());
    }

    #[test]
    fn test_hspan_clipped_on_both_sides() {
        let mut rb = RenderingBuffer::new(4, 1);
        let mut ren = RendererBase::new(PixfmtRgba32::new(&mut rb));
        let covers = [255u8; 10];
        ren.blend_solid_hspan(-3, 0, 10, &Rgba8::BLACK, &covers);
        for x in 0..4 {
            assert_eq!(ren.pixel(x, 0), Rgba8::BLACK);
        }
    }

    #[test]
    fn test_hspan_outside_is_ignored() {
        let mut rb = RenderingBuffer::new(4, 4);
        let mut ren = RendererBase::new(PixfmtRgba32::new(&mut rb));
        let covers = [255u8; 3];
        ren.blend_solid_hspan(-5, 1, 3, &Rgba8::BLACK, &covers);
        ren.blend_solid_hspan(10, 1, 3, &Rgba8::BLACK, &covers);
        ren.blend_solid_hspan(0, 9, 3, &Rgba8::BLACK, &covers);
        assert!(rb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_hline_reversed_endpoints() {
        let mut rb = RenderingBuffer::new(6, 2);
        let mut ren = RendererBase::new(PixfmtRgba32::new(&mut rb));
        ren.blend_hline(4, 1, 1, &Rgba8::WHITE, 255);
        assert_eq!(ren.pixel(0, 1), Rgba8::default());
        for x in 1..=4 {
            assert_eq!(ren.pixel(x, 1), Rgba8::WHITE);
        }
        assert_eq!(ren.pixel(5, 1), Rgba8::default());
    }
}
