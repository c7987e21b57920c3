//! High-level polygon scanline rasterizer with anti-aliasing.
//!
//! Accepts polygon contours (move_to / line_to / close), accumulates them in
//! a [`RasterizerCellsAa`], and sweeps the result row by row into a
//! [`Scanline`] container as 8-bit coverage spans.
//!
//! With a [`clip_box`](RasterizerScanlineAa::clip_box) set, edges pass
//! through a [`RasterizerSlClip`] first, so only rows inside the box ever
//! hold cells.

use crate::basics::{
    is_close, is_move_to, is_stop, is_vertex, poly_coord, FillingRule, VertexSource,
    POLY_SUBPIXEL_SHIFT,
};
use crate::rasterizer_cells_aa::RasterizerCellsAa;
use crate::rasterizer_sl_clip::{ClipRect, RasterizerSlClip};

const AA_SHIFT: u32 = 8;
const AA_SCALE: i32 = 1 << AA_SHIFT;
const AA_MASK: i32 = AA_SCALE - 1;
const AA_SCALE2: i32 = AA_SCALE * 2;
const AA_MASK2: i32 = AA_SCALE2 - 1;

// ============================================================================
// Scanline trait
// ============================================================================

/// Container that receives the coverage data of one swept row.
pub trait Scanline {
    /// Prepare for a new row, clearing all span data.
    fn reset_spans(&mut self);

    /// Add a single pixel at `x` with coverage `cover`.
    fn add_cell(&mut self, x: i32, cover: u32);

    /// Add `len` pixels starting at `x`, all with coverage `cover`.
    fn add_span(&mut self, x: i32, len: u32, cover: u32);

    /// Finalize the row at the given y.
    fn finalize(&mut self, y: i32);

    /// Number of spans in this row (0 means empty).
    fn num_spans(&self) -> u32;

    fn y(&self) -> i32;
}

// ============================================================================
// RasterizerScanlineAa
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Initial,
    MoveTo,
    LineTo,
    Closed,
}

/// Polygon rasterizer with anti-aliased output.
///
/// Usage:
/// 1. Optionally set `filling_rule()` and `clip_box()`
/// 2. Define contours with `move_to_d()` / `line_to_d()` or `add_path()`
/// 3. Call `rewind_scanlines()` then repeatedly `sweep_scanline()`
///
/// Adding a contour after a sweep starts a fresh polygon set.
#[derive(Debug, Clone)]
pub struct RasterizerScanlineAa {
    outline: RasterizerCellsAa,
    clipper: RasterizerSlClip,
    filling_rule: FillingRule,
    start_x: i32,
    start_y: i32,
    status: Status,
    scan_y: i32,
}

impl RasterizerScanlineAa {
    pub fn new() -> Self {
        Self {
            outline: RasterizerCellsAa::new(),
            clipper: RasterizerSlClip::new(),
            filling_rule: FillingRule::NonZero,
            start_x: 0,
            start_y: 0,
            status: Status::Initial,
            scan_y: 0,
        }
    }

    /// Discard all polygon data.
    pub fn reset(&mut self) {
        self.outline.reset();
        self.status = Status::Initial;
    }

    pub fn filling_rule(&mut self, rule: FillingRule) {
        self.filling_rule = rule;
    }

    /// Restrict rasterization to a rectangle in pixel coordinates.
    /// Discards any polygon data already added.
    pub fn clip_box(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.reset();
        self.clipper.clip_box(ClipRect::new(
            poly_coord(x1),
            poly_coord(y1),
            poly_coord(x2),
            poly_coord(y2),
        ));
    }

    pub fn reset_clipping(&mut self) {
        self.reset();
        self.clipper.reset_clipping();
    }

    // ========================================================================
    // Path building
    // ========================================================================

    /// Close the current contour back to its start point.
    pub fn close_polygon(&mut self) {
        if self.status == Status::LineTo {
            self.clipper
                .line_to(&mut self.outline, self.start_x, self.start_y);
            self.status = Status::Closed;
        }
    }

    /// Start a new contour at a 24.8 fixed-point position.
    pub fn move_to(&mut self, x: i32, y: i32) {
        if self.outline.sorted() {
            self.reset();
        }
        self.close_polygon();
        self.start_x = x;
        self.start_y = y;
        self.clipper.move_to(x, y);
        self.status = Status::MoveTo;
    }

    /// Add an edge to a 24.8 fixed-point position.
    pub fn line_to(&mut self, x: i32, y: i32) {
        if self.status == Status::Initial {
            return;
        }
        self.clipper.line_to(&mut self.outline, x, y);
        self.status = Status::LineTo;
    }

    pub fn move_to_d(&mut self, x: f64, y: f64) {
        self.move_to(poly_coord(x), poly_coord(y));
    }

    pub fn line_to_d(&mut self, x: f64, y: f64) {
        self.line_to(poly_coord(x), poly_coord(y));
    }

    /// Dispatch a vertex by path command.
    pub fn add_vertex(&mut self, x: f64, y: f64, cmd: u32) {
        if is_move_to(cmd) {
            self.move_to_d(x, y);
        } else if is_vertex(cmd) {
            self.line_to_d(x, y);
        } else if is_close(cmd) {
            self.close_polygon();
        }
    }

    /// Add all vertices of a vertex source.
    pub fn add_path(&mut self, vs: &mut dyn VertexSource, path_id: u32) {
        let mut x = 0.0;
        let mut y = 0.0;

        vs.rewind(path_id);
        if self.outline.sorted() {
            self.reset();
        }
        loop {
            let cmd = vs.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            self.add_vertex(x, y, cmd);
        }
    }

    pub fn min_x(&self) -> i32 {
        self.outline.min_x()
    }
    pub fn min_y(&self) -> i32 {
        self.outline.min_y()
    }
    pub fn max_x(&self) -> i32 {
        self.outline.max_x()
    }
    pub fn max_y(&self) -> i32 {
        self.outline.max_y()
    }

    // ========================================================================
    // Scanline sweeping
    // ========================================================================

    /// Close open contours, sort cells, and position at the first row.
    /// Returns `false` if there is nothing to render.
    pub fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        self.outline.sort_cells();
        if self.outline.total_cells() == 0 {
            return false;
        }
        self.scan_y = self.outline.min_y();
        true
    }

    /// Position the sweep at row `y`. Returns `false` if `y` has no cells.
    #[cfg(test)]
    pub(crate) fn navigate_scanline(&mut self, y: i32) -> bool {
        self.close_polygon();
        self.outline.sort_cells();
        if self.outline.total_cells() == 0 || y < self.outline.min_y() || y > self.outline.max_y()
        {
            return false;
        }
        self.scan_y = y;
        true
    }

    /// Map an accumulated area to 8-bit coverage under the filling rule.
    #[inline]
    pub fn calculate_alpha(&self, area: i32) -> u32 {
        let mut cover = (area >> (POLY_SUBPIXEL_SHIFT * 2 + 1 - AA_SHIFT)).abs();
        if self.filling_rule == FillingRule::EvenOdd {
            cover &= AA_MASK2;
            if cover > AA_SCALE {
                cover = AA_SCALE2 - cover;
            }
        }
        cover.min(AA_MASK) as u32
    }

    /// Emit the spans of the current row into `sl`.
    fn sweep_row<SL: Scanline>(&self, y: i32, sl: &mut SL) {
        let cells = self.outline.scanline_cells(y);
        let mut cover = 0;
        let mut i = 0;

        while i < cells.len() {
            let x = cells[i].x;
            let mut area = 0;
            while i < cells.len() && cells[i].x == x {
                area += cells[i].area;
                cover += cells[i].cover;
                i += 1;
            }

            // Boundary pixel: partially covered by the edges crossing it.
            let mut span_start = x;
            if area != 0 {
                let alpha = self.calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - area);
                if alpha != 0 {
                    sl.add_cell(x, alpha);
                }
                span_start = x + 1;
            }

            // Interior run up to the next cell, at the accumulated winding.
            if let Some(next) = cells.get(i) {
                if next.x > span_start {
                    let alpha = self.calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                    if alpha != 0 {
                        sl.add_span(span_start, (next.x - span_start) as u32, alpha);
                    }
                }
            }
        }
    }

    /// Extract the next non-empty row of coverage data.
    ///
    /// Returns `false` once all rows have been consumed.
    pub fn sweep_scanline<SL: Scanline>(&mut self, sl: &mut SL) -> bool {
        loop {
            if self.scan_y > self.outline.max_y() {
                return false;
            }
            sl.reset_spans();
            self.sweep_row(self.scan_y, sl);
            if sl.num_spans() > 0 {
                break;
            }
            self.scan_y += 1;
        }
        sl.finalize(self.scan_y);
        self.scan_y += 1;
        true
    }

    /// Test whether pixel (tx, ty) receives any coverage.
    #[cfg(test)]
    pub(crate) fn hit_test(&mut self, tx: i32, ty: i32) -> bool {
        if !self.navigate_scanline(ty) {
            return false;
        }
        let mut sl = ScanlineHitTest::new(tx);
        self.sweep_row(ty, &mut sl);
        sl.hit()
    }
}

impl Default for RasterizerScanlineAa {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ScanlineHitTest
// ============================================================================

/// A scanline that only records whether one x coordinate was covered.
#[cfg(test)]
pub(crate) struct ScanlineHitTest {
    x: i32,
    y: i32,
    hit: bool,
}

#[cfg(test)]
impl ScanlineHitTest {
    fn new(x: i32) -> Self {
        Self { x, y: 0, hit: false }
    }

    fn hit(&self) -> bool {
        self.hit
    }
}

#[cfg(test)]
impl Scanline for ScanlineHitTest {
    fn reset_spans(&mut self) {}

    fn add_cell(&mut self, x: i32, _cover: u32) {
        if self.x == x {
            self.hit = true;
        }
    }

    fn add_span(&mut self, x: i32, len: u32, _cover: u32) {
        if self.x >= x && self.x < x + len as i32 {
            self.hit = true;
        }
    }

    fn finalize(&mut self, y: i32) {
        self.y = y;
    }

    fn num_spans(&self) -> u32 {
        1
    }

    fn y(&self) -> i32 {
        self.y
    }
}

// ============================================================================
// Tests
// ============================================================================
