//! # blob-poster
//!
//! Procedural generative posters: a canvas scattered with semi-transparent,
//! noise-perturbed circular blobs, with an optional outline ring per blob and
//! a title/subtitle overlay, written out as PNG.
//!
//! ## Architecture
//!
//! Synthesis and painting are separate steps:
//!
//! 1. **Config**: [`PosterConfig`] is parsed from TOML or built in code and
//!    validated into [`PosterParams`].
//! 2. **Synthesis**: [`render`] draws blob centres, radii, colours and radial
//!    noise from a seeded PCG generator into a [`Canvas`].
//! 3. **Rasterization**: [`Canvas::rasterize`] feeds each blob through the
//!    anti-aliased scanline pipeline (vertex source, cell rasterizer,
//!    scanline container, clipping renderer, RGBA pixel format).
//! 4. **Output**: [`write_png`] encodes the buffer.
//!
//! ```no_run
//! let config = blob_poster::PosterConfig {
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let canvas = blob_poster::render(&config)?;
//! blob_poster::write_png("poster.png", &canvas.rasterize()?)?;
//! # Ok::<(), blob_poster::Error>(())
//! ```

// Rendering primitives
pub mod basics;
pub mod color;
pub mod math;
pub mod rendering_buffer;

// Scanline pipeline
pub mod pixfmt_rgba;
pub mod rasterizer_cells_aa;
pub mod rasterizer_scanline_aa;
pub mod rasterizer_sl_clip;
pub mod renderer_base;
pub mod renderer_scanline;
pub mod scanline_u;
pub mod vcgen_contour;

// Text
pub mod glyph_raster_bin;
pub mod raster_font;
pub mod renderer_raster_text;
#[cfg(feature = "font")]
pub mod font_engine;

// Poster generation
pub mod blob;
pub mod config;
pub mod error;
pub mod noise;
pub mod palette;
pub mod png_writer;
pub mod poster;

pub use color::Rgba8;
pub use config::{PosterConfig, PosterParams};
pub use error::{Error, Result};
pub use noise::NoiseKind;
pub use palette::{Palette, PaletteStyle};
pub use png_writer::{png_bytes, write_png};
pub use poster::{render, render_params, render_with_rng, Canvas};
pub use rendering_buffer::RenderingBuffer;
