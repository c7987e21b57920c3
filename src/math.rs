//! Geometric helpers shared by the blob synthesizer and the outline ring.

use crate::basics::PointD;

/// Points closer than this are treated as coincident.
pub const VERTEX_DIST_EPSILON: f64 = 1e-14;

#[inline]
pub fn calc_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Unit normal to the segment (x1,y1)→(x2,y2), scaled by `thickness`.
///
/// For a polygon with positive signed area the normal points outward.
#[inline]
pub fn calc_orthogonal(thickness: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> (f64, f64) {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let d = (dx * dx + dy * dy).sqrt();
    (thickness * dy / d, -thickness * dx / d)
}

/// Signed polygon area via the shoelace formula. The sign gives orientation.
pub fn calc_polygon_area(vertices: &[PointD]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let sum: f64 = (0..n)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            a.x * b.y - a.y * b.x
        })
        .sum();
    sum * 0.5
}

/// Drop consecutive coincident points, including a closing duplicate of the
/// first point.
pub fn dedup_closed(points: &[PointD]) -> Vec<PointD> {
    let mut out: Vec<PointD> = Vec::with_capacity(points.len());
    for &p in points {
        match out.last() {
            Some(last) if calc_distance(last.x, last.y, p.x, p.y) <= VERTEX_DIST_EPSILON => {}
            _ => out.push(p),
        }
    }
    while out.len() > 1 {
        let (first, last) = (out[0], out[out.len() - 1]);
        if calc_distance(first.x, first.y, last.x, last.y) > VERTEX_DIST_EPSILON {
            break;
        }
        out.pop();
    }
    out
}
