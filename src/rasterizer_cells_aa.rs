//! Anti-aliased cell rasterizer engine.
//!
//! Converts edges (line segments in 24.8 fixed-point coordinates) into
//! pixel cells that carry a winding `cover` and a signed `area`. The
//! scanline rasterizer later turns these into per-pixel coverage.
//!
//! For every pixel an edge crosses, `cover` accumulates the edge's vertical
//! extent inside the pixel and `area` accumulates twice the signed area of
//! the fragment left of the edge, in subpixel units. Summing `cover` from
//! the left gives the winding of a pixel center; `area` corrects the
//! partially covered boundary pixel.

use crate::basics::{POLY_SUBPIXEL_MASK, POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};

const SCALE: i32 = POLY_SUBPIXEL_SCALE as i32;
const MASK: i32 = POLY_SUBPIXEL_MASK as i32;

/// Edges wider than this are split before walking, keeping the i32 area
/// products in range.
const DX_LIMIT: i64 = 16384 << POLY_SUBPIXEL_SHIFT;

/// A pixel cell storing accumulated coverage and area from edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAa {
    pub x: i32,
    pub y: i32,
    pub cover: i32,
    pub area: i32,
}

impl CellAa {
    const UNSET: CellAa = CellAa {
        x: i32::MAX,
        y: i32::MAX,
        cover: 0,
        area: 0,
    };

    #[inline]
    fn is_empty(&self) -> bool {
        self.cover == 0 && self.area == 0
    }
}

impl Default for CellAa {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Edge-to-cell conversion engine.
///
/// Cells are appended unsorted while edges are added. `sort_cells` orders
/// them by row then column and indexes each row, after which
/// `scanline_cells` returns a contiguous slice per row.
#[derive(Debug, Clone)]
pub struct RasterizerCellsAa {
    cells: Vec<CellAa>,
    rows: Vec<(usize, usize)>,
    curr_cell: CellAa,
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
    sorted: bool,
}

impl RasterizerCellsAa {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            rows: Vec::new(),
            curr_cell: CellAa::UNSET,
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
            sorted: false,
        }
    }

    /// Discard all cells, keeping allocations.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.rows.clear();
        self.curr_cell = CellAa::UNSET;
        self.min_x = i32::MAX;
        self.min_y = i32::MAX;
        self.max_x = i32::MIN;
        self.max_y = i32::MIN;
        self.sorted = false;
    }

    #[inline]
    pub fn min_x(&self) -> i32 {
        self.min_x
    }
    #[inline]
    pub fn min_y(&self) -> i32 {
        self.min_y
    }
    #[inline]
    pub fn max_x(&self) -> i32 {
        self.max_x
    }
    #[inline]
    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    #[inline]
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn sorted(&self) -> bool {
        self.sorted
    }

    /// Cells of row `y`, ordered by x. Only valid after `sort_cells()`;
    /// rows outside `[min_y, max_y]` are empty.
    pub fn scanline_cells(&self, y: i32) -> &[CellAa] {
        if !self.sorted || y < self.min_y || y > self.max_y {
            return &[];
        }
        match self.rows.get((y - self.min_y) as usize) {
            Some(&(start, end)) => &self.cells[start..end],
            None => &[],
        }
    }

    // ========================================================================
    // Cell bookkeeping
    // ========================================================================

    #[inline]
    fn add_curr_cell(&mut self) {
        if !self.curr_cell.is_empty() {
            self.cells.push(self.curr_cell);
        }
    }

    #[inline]
    fn set_curr_cell(&mut self, x: i32, y: i32) {
        if self.curr_cell.x != x || self.curr_cell.y != y {
            self.add_curr_cell();
            self.curr_cell = CellAa {
                x,
                y,
                cover: 0,
                area: 0,
            };
        }
    }

    #[inline]
    fn accumulate(&mut self, cover: i32, area: i32) {
        self.curr_cell.cover += cover;
        self.curr_cell.area += area;
    }

    fn extend_bounds(&mut self, ex: i32, ey: i32) {
        self.min_x = self.min_x.min(ex);
        self.max_x = self.max_x.max(ex);
        self.min_y = self.min_y.min(ey);
        self.max_y = self.max_y.max(ey);
    }

    // ========================================================================
    // Edge walking
    // ========================================================================

    /// Walk a segment that stays inside pixel row `ey`.
    ///
    /// `x1`/`x2` are 24.8 fixed point; `y1`/`y2` are the fractional y
    /// positions within the row (0..=POLY_SUBPIXEL_SCALE).
    fn render_hline(&mut self, ey: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1 & MASK;
        let fx2 = x2 & MASK;

        // Flat: no coverage, only move the current cell.
        if y1 == y2 {
            self.set_curr_cell(ex2, ey);
            return;
        }

        let dy = y2 - y1;

        // Entirely inside one cell.
        if ex1 == ex2 {
            self.accumulate(dy, (fx1 + fx2) * dy);
            return;
        }

        // Crosses several cells: distribute dy proportionally to the x run.
        let (mut p, first, incr, dx) = if x2 > x1 {
            ((SCALE - fx1) as i64 * dy as i64, SCALE, 1, x2 as i64 - x1 as i64)
        } else {
            (fx1 as i64 * dy as i64, 0, -1, x1 as i64 - x2 as i64)
        };

        let (mut delta, mut modulo) = floor_div_mod(p, dx);
        self.accumulate(delta, (fx1 + first) * delta);

        let mut ex = ex1 + incr;
        self.set_curr_cell(ex, ey);
        let mut y = y1 + delta;

        if ex != ex2 {
            p = SCALE as i64 * (y2 - y + delta) as i64;
            let (lift, rem) = floor_div_mod(p, dx);
            modulo -= dx;

            while ex != ex2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dx;
                    delta += 1;
                }
                self.accumulate(delta, SCALE * delta);
                y += delta;
                ex += incr;
                self.set_curr_cell(ex, ey);
            }
        }

        delta = y2 - y;
        self.accumulate(delta, (fx2 + SCALE - first) * delta);
    }

    /// Add a line segment in 24.8 fixed-point coordinates.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let dx = x2 as i64 - x1 as i64;
        if dx >= DX_LIMIT || dx <= -DX_LIMIT {
            let cx = ((x1 as i64 + x2 as i64) >> 1) as i32;
            let cy = ((y1 as i64 + y2 as i64) >> 1) as i32;
            self.line(x1, y1, cx, cy);
            self.line(cx, cy, x2, y2);
            return;
        }

        let dy = y2 as i64 - y1 as i64;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let ey1 = y1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 & MASK;
        let fy2 = y2 & MASK;

        self.extend_bounds(ex1, ey1);
        self.extend_bounds(ex2, ey2);
        self.set_curr_cell(ex1, ey1);

        if ey1 == ey2 {
            self.render_hline(ey1, x1, fy1, x2, fy2);
            return;
        }

        // Crosses several rows: split the x run proportionally to dy.
        let (p, first, incr, dy_abs) = if dy > 0 {
            ((SCALE - fy1) as i64 * dx, SCALE, 1, dy)
        } else {
            (fy1 as i64 * dx, 0, -1, -dy)
        };

        let (delta, mut modulo) = floor_div_mod(p, dy_abs);
        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first);

        let mut ey = ey1 + incr;
        self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey);

        if ey != ey2 {
            let (lift, rem) = floor_div_mod(SCALE as i64 * dx, dy_abs);
            modulo -= dy_abs;

            while ey != ey2 {
                let mut step = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dy_abs;
                    step += 1;
                }
                let x_to = x_from + step;
                self.render_hline(ey, x_from, SCALE - first, x_to, first);
                x_from = x_to;
                ey += incr;
                self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey);
            }
        }

        self.render_hline(ey, x_from, SCALE - first, x2, fy2);
    }

    /// Sort cells by row then column and build the per-row index.
    /// Idempotent until the next `reset`.
    pub fn sort_cells(&mut self) {
        if self.sorted {
            return;
        }
        self.add_curr_cell();
        self.curr_cell = CellAa::UNSET;

        if self.cells.is_empty() {
            return;
        }

        self.cells.sort_unstable_by_key(|c| (c.y, c.x));

        let row_count = (self.max_y - self.min_y + 1) as usize;
        self.rows.clear();
        self.rows.resize(row_count, (0, 0));

        let mut start = 0;
        while start < self.cells.len() {
            let y = self.cells[start].y;
            let end = start
                + self.cells[start..]
                    .iter()
                    .take_while(|c| c.y == y)
                    .count();
            self.rows[(y - self.min_y) as usize] = (start, end);
            start = end;
        }

        self.sorted = true;
    }
}

impl Default for RasterizerCellsAa {
    fn default() -> Self {
        Self::new()
    }
}

/// Floor division with a non-negative remainder (divisor must be positive).
#[inline]
fn floor_div_mod(p: i64, d: i64) -> (i32, i64) {
    let mut q = p / d;
    let mut r = p % d;
    if r < 0 {
        q -= 1;
        r += d;
    }
    (q as i32, r)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const S: i32 = POLY_SUBPIXEL_SCALE as i32;

    fn total_cover(ras: &RasterizerCellsAa) -> i32 {
        (ras.min_y()..=ras.max_y())
            .flat_map(|y| ras.scanline_cells(y).iter())
            .map(|c| c.cover)
            .sum()
    }

    #[test]
    fn test_new_rasterizer_is_empty() {
        let ras = RasterizerCellsAa::new();
        assert_eq!(ras.total_cells(), 0);
        assert!(!ras.sorted());
        assert_eq!(ras.min_x(), i32::MAX);
        assert_eq!(ras.max_y(), i32::MIN);
    }

    #[test]
    fn test_floor_div_mod() {
        assert_eq!(floor_div_mod(7, 2), (3, 1));
        assert_eq!(floor_div_mod(-7, 2), (-4, 1));
        assert_eq!(floor_div_mod(-8, 2), (-4, 0));
    }

    #[test]
    fn test_reset() {
        let mut ras = RasterizerCellsAa::new();
        ras.line(0, 0, 4 * S, 4 * S);
        ras.sort_cells();
        assert!(ras.total_cells() > 0);
        ras.reset();
        assert_eq!(ras.total_cells(), 0);
        assert!(!ras.sorted());
    }

    #[test]
    fn test_horizontal_line_has_no_cover() {
        let mut ras = RasterizerCellsAa::new();
        ras.line(0, 10 * S, 2 * S, 10 * S);
        ras.sort_cells();
        assert_eq!(ras.total_cells(), 0);
    }

    #[test]
    fn test_vertical_line_cover_sum() {
        let mut ras = RasterizerCellsAa::new();
        let x = 10 * S + S / 2;
        ras.line(x, 5 * S, x, 8 * S);
        ras.sort_cells();
        assert_eq!(ras.min_y(), 5);
        assert_eq!(ras.max_y(), 8);
        assert_eq!(total_cover(&ras), 3 * S);
        for y in 5..8 {
            let row = ras.scanline_cells(y);
            assert_eq!(row.len(), 1);
            assert_eq!(row[0].x, 10);
            // Edge at half a pixel: area = 2 * (S / 2) * S
            assert_eq!(row[0].area, S * S);
        }
    }

    #[test]
    fn test_upward_line_has_negative_cover() {
        let mut ras = RasterizerCellsAa::new();
        ras.line(3 * S, 6 * S, 3 * S, 2 * S);
        ras.sort_cells();
        assert_eq!(total_cover(&ras), -4 * S);
    }

    #[test]
    fn test_diagonal_line_cover_sum() {
        let mut ras = RasterizerCellsAa::new();
        ras.line(0, 0, 5 * S, 5 * S);
        ras.sort_cells();
        assert_eq!(total_cover(&ras), 5 * S);
        assert_eq!(ras.min_x(), 0);
        assert_eq!(ras.max_x(), 5);
    }

    #[test]
    fn test_shallow_line_spans_many_cells_in_one_row() {
        let mut ras = RasterizerCellsAa::new();
        ras.line(0, 0, 10 * S, S - 1);
        ras.sort_cells();
        let row = ras.scanline_cells(0);
        assert!(row.len() >= 10);
        assert_eq!(row.iter().map(|c| c.cover).sum::<i32>(), S - 1);
    }

    #[test]
    fn test_cells_sorted_by_x_within_row() {
        let mut ras = RasterizerCellsAa::new();
        ras.line(10 * S, 0, 0, 3 * S);
        ras.line(0, 3 * S, 10 * S, 0);
        ras.sort_cells();
        for y in ras.min_y()..=ras.max_y() {
            for w in ras.scanline_cells(y).windows(2) {
                assert!(w[0].x <= w[1].x, "unsorted: {} > {}", w[0].x, w[1].x);
                assert_eq!(w[0].y, y);
            }
        }
    }

    #[test]
    fn test_closed_triangle_cover_cancels() {
        let mut ras = RasterizerCellsAa::new();
        ras.line(10 * S, 10 * S, 20 * S, 10 * S);
        ras.line(20 * S, 10 * S, 15 * S, 20 * S);
        ras.line(15 * S, 20 * S, 10 * S, 10 * S);
        ras.sort_cells();
        assert!(ras.total_cells() > 0);
        assert_eq!(total_cover(&ras), 0);
        for y in 10..20 {
            let row_cover: i32 = ras.scanline_cells(y).iter().map(|c| c.cover).sum();
            assert_eq!(row_cover, 0, "row {y} does not close");
        }
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut ras = RasterizerCellsAa::new();
        ras.line(5 * S, 0, 5 * S, 3 * S);
        ras.sort_cells();
        let n = ras.total_cells();
        ras.sort_cells();
        assert_eq!(ras.total_cells(), n);
    }

    #[test]
    fn test_negative_coordinates() {
        let mut ras = RasterizerCellsAa::new();
        ras.line(-5 * S, -5 * S, -1 * S, 2 * S);
        ras.sort_cells();
        assert_eq!(ras.min_x(), -5);
        assert_eq!(ras.min_y(), -5);
        assert_eq!(total_cover(&ras), 7 * S);
    }

    #[test]
    fn test_large_dx_is_subdivided() {
        let mut ras = RasterizerCellsAa::new();
        ras.line(0, 0, 20000 * S, S);
        ras.sort_cells();
        assert!(ras.total_cells() > 0);
        assert_eq!(total_cover(&ras), S);
    }

    #[test]
    fn test_rows_outside_range_are_empty() {
        let mut ras = RasterizerCellsAa::new();
        ras.line(S, S, S, 3 * S);
        ras.sort_cells();
        assert!(ras.scanline_cells(0).is_empty());
        assert!(ras.scanline_cells(100).is_empty());
    }
}
