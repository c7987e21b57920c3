//! Viewport clipping in front of the cell rasterizer.
//!
//! Edges are clipped in 24.8 fixed point before they become cells. Parts of
//! an edge left or right of the box are folded onto the box's vertical
//! border so the winding still accumulates, and parts above or below are
//! dropped. Rows outside the canvas therefore never produce cells, however
//! large the polygon.

use crate::basics::iround;
use crate::rasterizer_cells_aa::RasterizerCellsAa;

// Outcodes: which side of the box a coordinate lies on.
const X2_CLIPPED: u32 = 1;
const Y2_CLIPPED: u32 = 2;
const X1_CLIPPED: u32 = 4;
const Y1_CLIPPED: u32 = 8;
const X_CLIPPED: u32 = X1_CLIPPED | X2_CLIPPED;
const Y_CLIPPED: u32 = Y1_CLIPPED | Y2_CLIPPED;

/// Clip rectangle in 24.8 fixed point, inclusive, normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl ClipRect {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    #[inline]
    fn flags(&self, x: i32, y: i32) -> u32 {
        self.flags_x(x) | self.flags_y(y)
    }

    #[inline]
    fn flags_x(&self, x: i32) -> u32 {
        (x > self.x2) as u32 * X2_CLIPPED | (x < self.x1) as u32 * X1_CLIPPED
    }

    #[inline]
    fn flags_y(&self, y: i32) -> u32 {
        (y > self.y2) as u32 * Y2_CLIPPED | (y < self.y1) as u32 * Y1_CLIPPED
    }
}

/// `round(a * b / c)` without intermediate overflow.
#[inline]
fn mul_div(a: i32, b: i32, c: i32) -> i32 {
    iround(a as f64 * b as f64 / c as f64)
}

/// Edge clipper feeding a [`RasterizerCellsAa`].
#[derive(Debug, Clone, Default)]
pub struct RasterizerSlClip {
    clip: Option<ClipRect>,
    x1: i32,
    y1: i32,
    f1: u32,
}

impl RasterizerSlClip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clip_box(&mut self, rect: ClipRect) {
        self.clip = Some(rect);
    }

    pub fn reset_clipping(&mut self) {
        self.clip = None;
    }

    pub fn clip_rect(&self) -> Option<ClipRect> {
        self.clip
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.x1 = x;
        self.y1 = y;
        if let Some(c) = &self.clip {
            self.f1 = c.flags(x, y);
        }
    }

    /// Emit the clipped part of the edge from the current point to (x2, y2).
    pub fn line_to(&mut self, ras: &mut RasterizerCellsAa, x2: i32, y2: i32) {
        let Some(c) = self.clip else {
            ras.line(self.x1, self.y1, x2, y2);
            self.x1 = x2;
            self.y1 = y2;
            return;
        };

        let (x1, y1, f1) = (self.x1, self.y1, self.f1);
        let f2 = c.flags(x2, y2);
        self.x1 = x2;
        self.y1 = y2;
        self.f1 = f2;

        // Entirely above or entirely below.
        if f1 & Y_CLIPPED != 0 && f1 & Y_CLIPPED == f2 & Y_CLIPPED {
            return;
        }

        // y where the edge crosses the vertical line at `x`.
        let cross = |x: i32| y1 + mul_div(x - x1, y2 - y1, x2 - x1);

        match (f1 & X_CLIPPED, f2 & X_CLIPPED) {
            (0, 0) => clip_y(ras, &c, x1, y1, x2, y2, f1, f2),
            (0, X2_CLIPPED) => {
                let y3 = cross(c.x2);
                let f3 = c.flags_y(y3);
                clip_y(ras, &c, x1, y1, c.x2, y3, f1, f3);
                clip_y(ras, &c, c.x2, y3, c.x2, y2, f3, f2);
            }
            (X2_CLIPPED, 0) => {
                let y3 = cross(c.x2);
                let f3 = c.flags_y(y3);
                clip_y(ras, &c, c.x2, y1, c.x2, y3, f1, f3);
                clip_y(ras, &c, c.x2, y3, x2, y2, f3, f2);
            }
            (X2_CLIPPED, X2_CLIPPED) => clip_y(ras, &c, c.x2, y1, c.x2, y2, f1, f2),
            (0, X1_CLIPPED) => {
                let y3 = cross(c.x1);
                let f3 = c.flags_y(y3);
                clip_y(ras, &c, x1, y1, c.x1, y3, f1, f3);
                clip_y(ras, &c, c.x1, y3, c.x1, y2, f3, f2);
            }
            (X1_CLIPPED, 0) => {
                let y3 = cross(c.x1);
                let f3 = c.flags_y(y3);
                clip_y(ras, &c, c.x1, y1, c.x1, y3, f1, f3);
                clip_y(ras, &c, c.x1, y3, x2, y2, f3, f2);
            }
            (X1_CLIPPED, X1_CLIPPED) => clip_y(ras, &c, c.x1, y1, c.x1, y2, f1, f2),
            (X2_CLIPPED, X1_CLIPPED) => {
                let (y3, y4) = (cross(c.x2), cross(c.x1));
                let (f3, f4) = (c.flags_y(y3), c.flags_y(y4));
                clip_y(ras, &c, c.x2, y1, c.x2, y3, f1, f3);
                clip_y(ras, &c, c.x2, y3, c.x1, y4, f3, f4);
                clip_y(ras, &c, c.x1, y4, c.x1, y2, f4, f2);
            }
            (X1_CLIPPED, X2_CLIPPED) => {
                let (y3, y4) = (cross(c.x1), cross(c.x2));
                let (f3, f4) = (c.flags_y(y3), c.flags_y(y4));
                clip_y(ras, &c, c.x1, y1, c.x1, y3, f1, f3);
                clip_y(ras, &c, c.x1, y3, c.x2, y4, f3, f4);
                clip_y(ras, &c, c.x2, y4, c.x2, y2, f4, f2);
            }
            // A coordinate cannot be both left and right of the box.
            _ => {}
        }
    }
}

/// Emit the part of an x-visible segment that lies within the box rows.
#[allow(clippy::too_many_arguments)]
fn clip_y(
    ras: &mut RasterizerCellsAa,
    c: &ClipRect,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    f1: u32,
    f2: u32,
) {
    let (f1, f2) = (f1 & Y_CLIPPED, f2 & Y_CLIPPED);
    if f1 | f2 == 0 {
        ras.line(x1, y1, x2, y2);
        return;
    }
    if f1 == f2 {
        return;
    }

    let cross = |y: i32| x1 + mul_div(y - y1, x2 - x1, y2 - y1);
    let (mut tx1, mut ty1, mut tx2, mut ty2) = (x1, y1, x2, y2);
    if f1 & Y1_CLIPPED != 0 {
        tx1 = cross(c.y1);
        ty1 = c.y1;
    }
    if f1 & Y2_CLIPPED != 0 {
        tx1 = cross(c.y2);
        ty1 = c.y2;
    }
    if f2 & Y1_CLIPPED != 0 {
        tx2 = cross(c.y1);
        ty2 = c.y1;
    }
    if f2 & Y2_CLIPPED != 0 {
        tx2 = cross(c.y2);
        ty2 = c.y2;
    }
    ras.line(tx1, ty1, tx2, ty2);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::POLY_SUBPIXEL_SCALE;

    const S: i32 = POLY_SUBPIXEL_SCALE as i32;

    fn clipped(rect: ClipRect) -> RasterizerSlClip {
        let mut clip = RasterizerSlClip::new();
        clip.clip_box(rect);
        clip
    }

    #[test]
    fn test_clip_rect_normalizes() {
        assert_eq!(ClipRect::new(10, 20, 0, 5), ClipRect::new(0, 5, 10, 20));
    }

    #[test]
    fn test_mul_div_rounds() {
        assert_eq!(mul_div(10, 20, 5), 40);
        assert_eq!(mul_div(7, 3, 2), 11);
        assert_eq!(mul_div(1 << 30, 1 << 20, 1 << 25), 1 << 25);
    }

    #[test]
    fn test_without_box_passes_through() {
        let mut clip = RasterizerSlClip::new();
        let mut ras = RasterizerCellsAa::new();
        clip.move_to(-100 * S, -100 * S);
        clip.line_to(&mut ras, 10 * S, 10 * S);
        ras.sort_cells();
        assert_eq!(ras.min_y(), -100);
    }

    #[test]
    fn test_edge_above_box_is_dropped() {
        let mut clip = clipped(ClipRect::new(0, 10 * S, 100 * S, 90 * S));
        let mut ras = RasterizerCellsAa::new();
        clip.move_to(10 * S, 0);
        clip.line_to(&mut ras, 50 * S, 5 * S);
        ras.sort_cells();
        assert_eq!(ras.total_cells(), 0);
    }

    #[test]
    fn test_edge_crossing_right_border_is_folded() {
        let mut clip = clipped(ClipRect::new(0, 0, 50 * S, 100 * S));
        let mut ras = RasterizerCellsAa::new();
        clip.move_to(10 * S, 10 * S);
        clip.line_to(&mut ras, 80 * S, 80 * S);
        ras.sort_cells();
        assert!(ras.total_cells() > 0);
        assert!(ras.max_x() <= 50);
        // The folded part keeps its vertical extent.
        assert!(ras.max_y() >= 75);
    }

    #[test]
    fn test_huge_edge_only_touches_box_rows() {
        let mut clip = clipped(ClipRect::new(0, 0, 20 * S, 20 * S));
        let mut ras = RasterizerCellsAa::new();
        clip.move_to(-1_000_000 * S, -1_000_000 * S);
        clip.line_to(&mut ras, 1_000_000 * S, 1_000_000 * S);
        ras.sort_cells();
        assert!(ras.min_y() >= 0 && ras.max_y() <= 20);
        assert!(ras.total_cells() < 200);
    }

    #[test]
    fn test_reset_clipping() {
        let mut clip = clipped(ClipRect::new(0, 0, S, S));
        assert!(clip.clip_rect().is_some());
        clip.reset_clipping();
        assert!(clip.clip_rect().is_none());
    }
}
