//! Unpacked scanline container.
//!
//! Holds one coverage byte per pixel for the current row, plus a list of
//! spans that index into that coverage array. Adjacent cells and spans are
//! merged so a solid blob row usually arrives as a single span.

use crate::rasterizer_scanline_aa::Scanline;

/// A horizontal run within a scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanlineSpan {
    pub x: i32,
    pub len: i32,
    /// Index of the first coverage byte in [`ScanlineU8::covers`].
    pub cover_offset: usize,
}

/// Scanline with per-pixel u8 coverage.
///
/// Call `reset(min_x, max_x)` once per polygon set with the rasterizer's
/// horizontal bounds; x values added afterwards must increase within a row.
#[derive(Debug, Clone, Default)]
pub struct ScanlineU8 {
    min_x: i32,
    y_val: i32,
    covers: Vec<u8>,
    spans: Vec<ScanlineSpan>,
    next_x: Option<i32>,
}

impl ScanlineU8 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the coverage array for the x range `[min_x, max_x]`.
    pub fn reset(&mut self, min_x: i32, max_x: i32) {
        let len = (max_x - min_x + 2).max(0) as usize;
        if len > self.covers.len() {
            self.covers.resize(len, 0);
        }
        self.min_x = min_x;
        self.reset_spans();
    }

    /// Spans of the current row in increasing x.
    pub fn begin(&self) -> &[ScanlineSpan] {
        &self.spans
    }

    /// Coverage bytes for a given span.
    pub fn span_covers(&self, span: &ScanlineSpan) -> &[u8] {
        &self.covers[span.cover_offset..span.cover_offset + span.len as usize]
    }

    /// The full coverage array; spans index into it.
    pub fn covers(&self) -> &[u8] {
        &self.covers
    }

    fn push(&mut self, x: i32, len: u32) {
        match self.spans.last_mut() {
            Some(last) if self.next_x == Some(x) => last.len += len as i32,
            _ => self.spans.push(ScanlineSpan {
                x,
                len: len as i32,
                cover_offset: (x - self.min_x) as usize,
            }),
        }
        self.next_x = Some(x + len as i32);
    }
}

impl Scanline for ScanlineU8 {
    fn reset_spans(&mut self) {
        self.spans.clear();
        self.next_x = None;
    }

    fn add_cell(&mut self, x: i32, cover: u32) {
        self.covers[(x - self.min_x) as usize] = cover as u8;
        self.push(x, 1);
    }

    fn add_span(&mut self, x: i32, len: u32, cover: u32) {
        let start = (x - self.min_x) as usize;
        self.covers[start..start + len as usize].fill(cover as u8);
        self.push(x, len);
    }

    fn finalize(&mut self, y: i32) {
        self.y_val = y;
    }

    fn num_spans(&self) -> u32 {
        self.spans.len() as u32
    }

    fn y(&self) -> i32 {
        self.y_val
    }
}

// ============================================================================
// Tests
// ============================================================================
