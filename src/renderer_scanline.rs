//! Scanline rendering driver.
//!
//! Ties the pipeline together: sweep every row out of the rasterizer into a
//! [`ScanlineU8`] and blend its spans through the clipping base renderer in a
//! single solid color.

use crate::pixfmt_rgba::PixelFormat;
use crate::rasterizer_scanline_aa::{RasterizerScanlineAa, Scanline};
use crate::renderer_base::RendererBase;
use crate::scanline_u::ScanlineU8;

/// Render all scanlines from the rasterizer as a solid color.
///
/// Returns the number of rows that produced at least one span.
pub fn render_scanlines_aa_solid<PF: PixelFormat>(
    ras: &mut RasterizerScanlineAa,
    sl: &mut ScanlineU8,
    ren: &mut RendererBase<PF>,
    color: &PF::ColorType,
) -> usize {
    if !ras.rewind_scanlines() {
        return 0;
    }

    sl.reset(ras.min_x(), ras.max_x());
    let mut rows = 0;
    while ras.sweep_scanline(sl) {
        let y = sl.y();
        for span in sl.begin() {
            ren.blend_solid_hspan(span.x, y, span.len, color, sl.span_covers(span));
        }
        rows += 1;
    }
    rows
}

// ============================================================================
// Tests
// ============================================================================
