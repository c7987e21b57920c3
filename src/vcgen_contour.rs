//! Outline ring generator.
//!
//! Offsets a closed polygon outward and inward by half the stroke width
//! along its vertex normals and emits the two offset contours with opposite
//! winding. Filled with the non-zero rule the result is a band of constant
//! width centred on the original edge.
//!
//! Joins are mitered; a join whose miter would exceed `miter_limit` times
//! the offset distance is beveled instead.

use crate::basics::{
    is_move_to, is_stop, is_vertex, PointD, VertexSource, PATH_CMD_END_POLY, PATH_CMD_LINE_TO,
    PATH_CMD_MOVE_TO, PATH_CMD_STOP, PATH_FLAGS_CLOSE,
};
use crate::math::{calc_orthogonal, calc_polygon_area, dedup_closed};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Initial,
    Ready,
    Outer,
    Inner,
    Stop,
}

/// Ring generator over one closed source polygon.
#[derive(Debug, Clone)]
pub struct VcgenContour {
    width: f64,
    miter_limit: f64,
    src_vertices: Vec<PointD>,
    outer: Vec<PointD>,
    inner: Vec<PointD>,
    status: Status,
    out_vertex: usize,
}

impl VcgenContour {
    pub fn new() -> Self {
        Self {
            width: 1.0,
            miter_limit: 4.0,
            src_vertices: Vec::new(),
            outer: Vec::new(),
            inner: Vec::new(),
            status: Status::Initial,
            out_vertex: 0,
        }
    }

    /// Full stroke width; the ring extends `width / 2` to each side.
    pub fn set_width(&mut self, w: f64) {
        self.width = w;
        self.status = Status::Initial;
    }
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_miter_limit(&mut self, ml: f64) {
        self.miter_limit = ml;
        self.status = Status::Initial;
    }
    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    pub fn remove_all(&mut self) {
        self.src_vertices.clear();
        self.status = Status::Initial;
    }

    /// Feed one source vertex. End-of-polygon commands are ignored; the
    /// source is always treated as closed.
    pub fn add_vertex(&mut self, x: f64, y: f64, cmd: u32) {
        self.status = Status::Initial;
        if is_move_to(cmd) {
            self.src_vertices.clear();
            self.src_vertices.push(PointD::new(x, y));
        } else if is_vertex(cmd) {
            self.src_vertices.push(PointD::new(x, y));
        }
    }

    /// Read every vertex of `vs` into the generator.
    pub fn add_path(&mut self, vs: &mut dyn VertexSource, path_id: u32) {
        let (mut x, mut y) = (0.0, 0.0);
        vs.rewind(path_id);
        loop {
            let cmd = vs.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            self.add_vertex(x, y, cmd);
        }
    }

    fn build(&mut self) {
        let pts = dedup_closed(&self.src_vertices);
        self.outer.clear();
        self.inner.clear();
        if pts.len() < 3 || !(self.width > 0.0) {
            return;
        }
        let half = self.width / 2.0;
        let d = if calc_polygon_area(&pts) < 0.0 { -half } else { half };
        offset_polygon(&pts, d, self.miter_limit, &mut self.outer);
        offset_polygon(&pts, -d, self.miter_limit, &mut self.inner);
        self.inner.reverse();
    }

    fn emit(&mut self, x: &mut f64, y: &mut f64, next: Status) -> u32 {
        let pts = if self.status == Status::Outer {
            &self.outer
        } else {
            &self.inner
        };
        if self.out_vertex < pts.len() {
            let p = pts[self.out_vertex];
            *x = p.x;
            *y = p.y;
            self.out_vertex += 1;
            return if self.out_vertex == 1 {
                PATH_CMD_MOVE_TO
            } else {
                PATH_CMD_LINE_TO
            };
        }
        self.status = next;
        self.out_vertex = 0;
        PATH_CMD_END_POLY | PATH_FLAGS_CLOSE
    }
}

impl Default for VcgenContour {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexSource for VcgenContour {
    fn rewind(&mut self, _path_id: u32) {
        if self.status == Status::Initial {
            self.build();
        }
        self.status = Status::Ready;
        self.out_vertex = 0;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        loop {
            match self.status {
                Status::Initial => self.rewind(0),
                Status::Ready => {
                    if self.outer.is_empty() {
                        self.status = Status::Stop;
                    } else {
                        self.status = Status::Outer;
                        self.out_vertex = 0;
                    }
                }
                Status::Outer => return self.emit(x, y, Status::Inner),
                Status::Inner => return self.emit(x, y, Status::Stop),
                Status::Stop => return PATH_CMD_STOP,
            }
        }
    }
}

/// Offset closed polygon `pts` by `d` along its normals into `out`.
///
/// Positive `d` moves away from the interior when `pts` has positive area.
fn offset_polygon(pts: &[PointD], d: f64, miter_limit: f64, out: &mut Vec<PointD>) {
    let n = pts.len();
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let curr = pts[i];
        let next = pts[(i + 1) % n];

        let (n0x, n0y) = calc_orthogonal(1.0, prev.x, prev.y, curr.x, curr.y);
        let (n1x, n1y) = calc_orthogonal(1.0, curr.x, curr.y, next.x, next.y);
        let denom = 1.0 + n0x * n1x + n0y * n1y;

        // Miter length relative to |d| is sqrt(2 / denom).
        if denom > 2.0 / (miter_limit * miter_limit) {
            let k = d / denom;
            out.push(PointD::new(curr.x + (n0x + n1x) * k, curr.y + (n0y + n1y) * k));
        } else {
            out.push(PointD::new(curr.x + n0x * d, curr.y + n0y * d));
            out.push(PointD::new(curr.x + n1x * d, curr.y + n1y * d));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
