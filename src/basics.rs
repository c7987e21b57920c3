//! Foundation types, constants, and path command utilities.
//!
//! Everything the rasterizer pipeline shares: rounding helpers, coverage
//! and subpixel constants, fill rules, path commands, and the
//! [`VertexSource`] trait implemented by blobs and outline rings.

// ============================================================================
// Rounding
// ============================================================================

/// Round to the nearest integer, half away from zero.
#[inline]
pub fn iround(v: f64) -> i32 {
    if v < 0.0 {
        (v - 0.5) as i32
    } else {
        (v + 0.5) as i32
    }
}

/// Round to the nearest unsigned integer, half up.
#[inline]
pub fn uround(v: f64) -> u32 {
    (v + 0.5) as u32
}

// ============================================================================
// Coverage and subpixel constants
// ============================================================================

/// Anti-aliasing coverage of a single pixel (0 = none, 255 = full).
pub type CoverType = u8;

pub const COVER_FULL: CoverType = CoverType::MAX;

/// Fractional bits of rasterizer coordinates (24.8 fixed point).
pub const POLY_SUBPIXEL_SHIFT: u32 = 8;
pub const POLY_SUBPIXEL_SCALE: u32 = 1 << POLY_SUBPIXEL_SHIFT;
pub const POLY_SUBPIXEL_MASK: u32 = POLY_SUBPIXEL_SCALE - 1;

/// Convert a floating-point coordinate to 24.8 fixed point.
#[inline]
pub fn poly_coord(v: f64) -> i32 {
    iround(v * POLY_SUBPIXEL_SCALE as f64)
}

// ============================================================================
// Filling rule
// ============================================================================

/// Filling rule for polygon rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillingRule {
    #[default]
    NonZero,
    EvenOdd,
}

pub const PI: f64 = std::f64::consts::PI;

// ============================================================================
// Path commands
// ============================================================================

pub const PATH_CMD_STOP: u32 = 0;
pub const PATH_CMD_MOVE_TO: u32 = 1;
pub const PATH_CMD_LINE_TO: u32 = 2;
pub const PATH_CMD_END_POLY: u32 = 0x0F;
pub const PATH_CMD_MASK: u32 = 0x0F;

pub const PATH_FLAGS_CLOSE: u32 = 0x40;

#[inline]
pub fn is_stop(c: u32) -> bool {
    c == PATH_CMD_STOP
}

#[inline]
pub fn is_move_to(c: u32) -> bool {
    c == PATH_CMD_MOVE_TO
}

/// Returns `true` for move_to and line_to.
#[inline]
pub fn is_vertex(c: u32) -> bool {
    (PATH_CMD_MOVE_TO..PATH_CMD_END_POLY).contains(&c)
}

#[inline]
pub fn is_end_poly(c: u32) -> bool {
    (c & PATH_CMD_MASK) == PATH_CMD_END_POLY
}

/// Returns `true` for an end_poly command carrying the close flag.
#[inline]
pub fn is_close(c: u32) -> bool {
    is_end_poly(c) && c & PATH_FLAGS_CLOSE != 0
}

// ============================================================================
// Point
// ============================================================================

/// A 2D point in canvas pixel space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointD {
    pub x: f64,
    pub y: f64,
}

impl PointD {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &PointD) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ============================================================================
// VertexSource
// ============================================================================

/// A rewindable producer of path vertices.
///
/// `vertex` writes the coordinates and returns a path command; it returns
/// [`PATH_CMD_STOP`] once the path is exhausted.
pub trait VertexSource {
    fn rewind(&mut self, path_id: u32);
    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iround() {
        assert_eq!(iround(0.4), 0);
        assert_eq!(iround(0.5), 1);
        assert_eq!(iround(-0.5), -1);
        assert_eq!(iround(-1.4), -1);
    }

    #[test]
    fn test_uround() {
        assert_eq!(uround(0.49), 0);
        assert_eq!(uround(2.5), 3);
    }

    #[test]
    fn test_poly_coord() {
        assert_eq!(poly_coord(0.0), 0);
        assert_eq!(poly_coord(1.0), POLY_SUBPIXEL_SCALE as i32);
        assert_eq!(poly_coord(-2.0), -2 * POLY_SUBPIXEL_SCALE as i32);
    }

    #[test]
    fn test_path_command_queries() {
        assert!(is_vertex(PATH_CMD_MOVE_TO));
        assert!(is_vertex(PATH_CMD_LINE_TO));
        assert!(!is_vertex(PATH_CMD_STOP));
        assert!(is_end_poly(PATH_CMD_END_POLY | PATH_FLAGS_CLOSE));
        assert!(is_close(PATH_CMD_END_POLY | PATH_FLAGS_CLOSE));
        assert!(!is_close(PATH_CMD_END_POLY));
        assert!(is_stop(PATH_CMD_STOP));
    }

    #[test]
    fn test_point_distance() {
        let a = PointD::new(0.0, 0.0);
        let b = PointD::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }
}
