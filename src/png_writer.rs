//! PNG output for rendered posters.

use crate::error::{Error, Result};
use crate::rendering_buffer::RenderingBuffer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Encode `rbuf` as an 8-bit RGBA PNG into `w`.
pub fn encode_png<W: Write>(
    w: W,
    rbuf: &RenderingBuffer,
) -> std::result::Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, rbuf.width(), rbuf.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(rbuf.as_bytes())?;
    png_writer.finish()
}

/// Write `rbuf` to `path` as PNG and return the path written.
pub fn write_png(path: impl AsRef<Path>, rbuf: &RenderingBuffer) -> Result<PathBuf> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);

    encode_png(&mut out, rbuf).map_err(|e| match e {
        png::EncodingError::IoError(source) => Error::io(path, source),
        other => Error::Encoding(other.to_string()),
    })?;
    out.flush().map_err(|e| Error::io(path, e))?;

    log::info!(
        "wrote {}x{} poster to {}",
        rbuf.width(),
        rbuf.height(),
        path.display()
    );
    Ok(path.to_path_buf())
}

/// Encode `rbuf` to an in-memory PNG.
pub fn png_bytes(rbuf: &RenderingBuffer) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    encode_png(&mut bytes, rbuf).map_err(|e| Error::Encoding(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_png_bytes_signature_and_header() {
        let rb = RenderingBuffer::new(3, 2);
        let bytes = png_bytes(&rb).unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
        // IHDR width and height, big-endian.
        assert_eq!(&bytes[16..20], &3u32.to_be_bytes());
        assert_eq!(&bytes[20..24], &2u32.to_be_bytes());
    }

    #[test]
    fn test_write_png_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut rb = RenderingBuffer::new(4, 4);
        rb.clear(255);
        let written = write_png(&path, &rb).unwrap();
        assert_eq!(written, path);
        let data = std::fs::read(&path).unwrap();
        assert_eq!(&data[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_write_png_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/out.png");
        let rb = RenderingBuffer::new(1, 1);
        match write_png(&path, &rb) {
            Err(Error::IoFailure { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected {:?}", other),
        }
    }
}
