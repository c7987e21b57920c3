//! Owned, row-oriented RGBA8 pixel storage.
//!
//! Rows are stored top-down with a fixed stride of `width * 4` bytes, which
//! is exactly the layout the PNG encoder and the WASM canvas expect.

/// Bytes per RGBA8 pixel.
pub const BPP: usize = 4;

/// Owned pixel buffer with row access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderingBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl RenderingBuffer {
    /// Create a zero-filled (transparent black) buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize * BPP],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * BPP
    }

    /// Immutable slice for row `y`.
    pub fn row_slice(&self, y: u32) -> &[u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Mutable slice for row `y`.
    pub fn row_slice_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// The whole buffer, row-major, top to bottom.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Fill every byte in the buffer with `value`.
    pub fn clear(&mut self, value: u8) {
        self.data.fill(value);
    }
}

// ============================================================================
// Tests
// ============================================================================
