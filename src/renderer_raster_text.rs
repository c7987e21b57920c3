//! Raster text renderer for the embedded bitmap font.
//!
//! Draws a horizontal string glyph by glyph as `blend_solid_hspan` calls
//! through the clipping base renderer.

use crate::glyph_raster_bin::{GlyphRasterBin, GlyphRect};
use crate::pixfmt_rgba::PixelFormat;
use crate::renderer_base::RendererBase;

/// Render `text` with its baseline at `y`, starting at `x`.
///
/// With `bold`, each glyph is drawn a second time one scaled font pixel to
/// the right. Returns the x position after the last glyph.
pub fn render_raster_htext_solid<PF: PixelFormat>(
    ren: &mut RendererBase<PF>,
    glyph: &mut GlyphRasterBin,
    x: f64,
    y: f64,
    text: &str,
    color: &PF::ColorType,
    bold: bool,
) -> f64 {
    let passes: &[f64] = if bold {
        &[0.0, glyph.scale() as f64]
    } else {
        &[0.0]
    };

    let mut end = x;
    for &offset in passes {
        let mut cx = x + offset;
        let mut r = GlyphRect::default();
        for ch in text.chars() {
            glyph.prepare(&mut r, cx, y, ch);
            if r.x2 >= r.x1 {
                let len = r.x2 - r.x1 + 1;
                for row in r.y1..=r.y2 {
                    let span = glyph.span((row - r.y1) as u32);
                    ren.blend_solid_hspan(r.x1, row, len, color, span);
                }
            }
            cx += r.dx;
        }
        end = end.max(cx);
    }
    end
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba8;
    use crate::pixfmt_rgba::PixfmtRgba32;
    use crate::raster_font::FONT_5X7;
    use crate::rendering_buffer::RenderingBuffer;

    fn ink_columns(rb: &RenderingBuffer) -> Vec<u32> {
        (0..rb.width())
            .filter(|&x| {
                (0..rb.height()).any(|y| rb.row_slice(y)[x as usize * 4 + 3] != 0)
            })
            .collect()
    }

    #[test]
    fn test_render_htext() {
        let mut rb = RenderingBuffer::new(40, 20);
        let mut ren = RendererBase::new(PixfmtRgba32::new(&mut rb));
        let mut glyph = GlyphRasterBin::new(&FONT_5X7, 1);
        let red = Rgba8::rgb(255, 0, 0);
        let end = render_raster_htext_solid(&mut ren, &mut glyph, 2.0, 10.0, "T", &red, false);

        assert_eq!(end, 8.0);
        // Top bar of 'T' sits six rows above the baseline.
        for x in 2..7 {
            assert_eq!(ren.pixel(x, 4), red);
        }
        assert_eq!(ren.pixel(4, 10), red);
        assert_eq!(ren.pixel(2, 10), Rgba8::default());
    }

    #[test]
    fn test_render_empty_string() {
        let mut rb = RenderingBuffer::new(20, 20);
        let mut ren = RendererBase::new(PixfmtRgba32::new(&mut rb));
        let mut glyph = GlyphRasterBin::new(&FONT_5X7, 1);
        let end = render_raster_htext_solid(&mut ren, &mut glyph, 5.0, 5.0, "", &Rgba8::BLACK, false);
        assert_eq!(end, 5.0);
        assert!(rb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_bold_widens_strokes() {
        let mut plain = RenderingBuffer::new(40, 20);
        let mut bold = RenderingBuffer::new(40, 20);
        for (rb, is_bold) in [(&mut plain, false), (&mut bold, true)] {
            let mut ren = RendererBase::new(PixfmtRgba32::new(rb));
            let mut glyph = GlyphRasterBin::new(&FONT_5X7, 2);
            render_raster_htext_solid(&mut ren, &mut glyph, 0.0, 16.0, "I", &Rgba8::BLACK, is_bold);
        }
        let p = ink_columns(&plain);
        let b = ink_columns(&bold);
        assert_eq!(b.len(), p.len() + 2);
        assert!(p.iter().all(|x| b.contains(x)));
    }

    #[test]
    fn test_text_past_edge_is_clipped() {
        let mut rb = RenderingBuffer::new(10, 10);
        let mut ren = RendererBase::new(PixfmtRgba32::new(&mut rb));
        let mut glyph = GlyphRasterBin::new(&FONT_5X7, 3);
        render_raster_htext_solid(&mut ren, &mut glyph, -4.0, 5.0, "WWW", &Rgba8::BLACK, true);
        assert!(rb.as_bytes().chunks(4).any(|p| p[3] == 255));
    }
}
