//! Poster synthesis and rasterization.
//!
//! [`render`] turns a [`PosterConfig`] into a [`Canvas`]: an ordered list of
//! blobs plus background and overlay settings. [`Canvas::rasterize`] paints
//! it through the scanline AA pipeline into a [`RenderingBuffer`].
//!
//! Random draws happen in a fixed order per blob: centre x, centre y,
//! radius, palette index, then one noise draw per angular sample. The same
//! seed and parameters therefore always produce the same canvas.

use crate::basics::{FillingRule, PointD};
use crate::blob::Blob;
use crate::color::Rgba8;
use crate::config::{PosterConfig, PosterParams};
use crate::error::Result;
use crate::glyph_raster_bin::GlyphRasterBin;
use crate::pixfmt_rgba::{PixelFormat, PixfmtRgba32};
use crate::raster_font::FONT_5X7;
use crate::rasterizer_scanline_aa::RasterizerScanlineAa;
use crate::renderer_base::RendererBase;
use crate::renderer_raster_text::render_raster_htext_solid;
use crate::renderer_scanline::render_scanlines_aa_solid;
use crate::rendering_buffer::RenderingBuffer;
use crate::scanline_u::ScanlineU8;
use crate::vcgen_contour::VcgenContour;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::path::PathBuf;

/// Left margin of the overlay as a fraction of canvas width.
const TEXT_LEFT: f64 = 0.025;
/// Top of the title as a fraction of canvas height.
const TITLE_TOP: f64 = 0.05;
/// Top of the subtitle as a fraction of canvas height.
const SUBTITLE_TOP: f64 = 0.10;
/// Title and subtitle cell heights as a fraction of canvas height.
const TITLE_SIZE: f64 = 0.024;
const SUBTITLE_SIZE: f64 = 0.016;

// ============================================================================
// Canvas
// ============================================================================

/// Static text drawn over the blobs.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub color: Rgba8,
    /// TrueType font to use instead of the built-in raster font.
    pub font_path: Option<PathBuf>,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.subtitle.is_none()
    }
}

/// Outline ring settings applied to every blob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub width: f64,
    pub color: Rgba8,
}

/// A poster ready to be rasterized. Blobs are painted in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: Rgba8,
    blobs: Vec<Blob>,
    outline: Option<Outline>,
    overlay: Option<Overlay>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba8) -> Self {
        Self {
            width,
            height,
            background,
            blobs: Vec::new(),
            outline: None,
            overlay: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> Rgba8 {
        self.background
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn outline(&self) -> Option<Outline> {
        self.outline
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Append a blob on top of those already present.
    pub fn push_blob(&mut self, blob: Blob) {
        self.blobs.push(blob);
    }

    pub fn set_outline(&mut self, outline: Option<Outline>) {
        self.outline = outline.filter(|o| o.width > 0.0);
    }

    pub fn set_overlay(&mut self, overlay: Option<Overlay>) {
        self.overlay = overlay.filter(|o| !o.is_empty());
    }

    /// Paint the canvas into a new RGBA buffer.
    pub fn rasterize(&self) -> Result<RenderingBuffer> {
        let mut rbuf = RenderingBuffer::new(self.width, self.height);
        {
            let mut ren = RendererBase::new(PixfmtRgba32::new(&mut rbuf));
            ren.clear(&self.background);

            let clip = *ren.clip_box();
            let mut ras = RasterizerScanlineAa::new();
            ras.filling_rule(FillingRule::NonZero);
            ras.clip_box(
                clip.x1 as f64,
                clip.y1 as f64,
                (clip.x2 + 1) as f64,
                (clip.y2 + 1) as f64,
            );
            let mut sl = ScanlineU8::new();
            let mut ring = VcgenContour::new();

            // A ring reaches at most miter_limit * width / 2 past the fill.
            let margin = self
                .outline
                .map_or(0.0, |o| o.width * ring.miter_limit() / 2.0);
            let mut skipped = 0;

            for blob in &self.blobs {
                if !self.overlaps(blob, margin) {
                    skipped += 1;
                    continue;
                }
                ras.reset();
                ras.add_path(&mut blob.path(), 0);
                render_scanlines_aa_solid(&mut ras, &mut sl, &mut ren, &blob.fill_color());

                if let Some(outline) = self.outline {
                    ring.remove_all();
                    ring.set_width(outline.width);
                    ring.add_path(&mut blob.path(), 0);
                    ras.reset();
                    ras.add_path(&mut ring, 0);
                    render_scanlines_aa_solid(&mut ras, &mut sl, &mut ren, &outline.color);
                }
            }

            if let Some(overlay) = &self.overlay {
                draw_overlay(&mut ren, overlay)?;
            }
            log::debug!(
                "rasterized {} blobs onto {}x{} ({} off-canvas)",
                self.blobs.len() - skipped,
                self.width,
                self.height,
                skipped
            );
        }
        Ok(rbuf)
    }

    /// Whether `blob`, grown by `margin`, touches the canvas.
    fn overlaps(&self, blob: &Blob, margin: f64) -> bool {
        let (lo, hi) = blob.bounds();
        hi.x + margin >= 0.0
            && hi.y + margin >= 0.0
            && lo.x - margin <= self.width as f64
            && lo.y - margin <= self.height as f64
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Validate `config` and synthesize a canvas, seeding from `config.seed`
/// or from OS entropy when no seed is given.
pub fn render(config: &PosterConfig) -> Result<Canvas> {
    let params = config.validate()?;
    let mut rng = match params.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    };
    render_params(&params, &mut rng)
}

/// Validate `config` and synthesize a canvas drawing from `rng`.
/// `config.seed` is ignored.
pub fn render_with_rng<R: Rng>(config: &PosterConfig, rng: &mut R) -> Result<Canvas> {
    let params = config.validate()?;
    render_params(&params, rng)
}

/// Synthesize a canvas from already-validated parameters.
pub fn render_params<R: Rng>(params: &PosterParams, rng: &mut R) -> Result<Canvas> {
    let noise = params.noise.sampler(params.wobble)?;
    let palette = params.palette;
    let (w, h) = (params.width as f64, params.height as f64);

    let mut canvas = Canvas::new(params.width, params.height, params.background);
    for _ in 0..params.blob_count {
        let x = rng.gen_range(0.0..w);
        let y = rng.gen_range(0.0..h);
        let radius = rng.gen_range(params.radius_min..=params.radius_max);
        let color = palette.colors[rng.gen_range(0..palette.len())];
        canvas.push_blob(Blob::synthesize(
            PointD::new(x, y),
            radius,
            params.samples,
            color,
            params.alpha,
            &noise,
            rng,
        )?);
    }

    canvas.set_outline(Some(Outline {
        width: params.outline_width,
        color: params.outline_color,
    }));
    canvas.set_overlay(Some(Overlay {
        title: params.title.clone(),
        subtitle: params.subtitle.clone(),
        color: params.text_color,
        font_path: params.font_path.clone(),
    }));

    log::debug!(
        "synthesized {} blobs ({} palette, {} noise, wobble {})",
        canvas.blobs().len(),
        palette.name,
        params.noise,
        params.wobble
    );
    Ok(canvas)
}

// ============================================================================
// Overlay text
// ============================================================================

/// Integer glyph scale giving a cell height near `fraction` of the canvas.
fn text_scale(height: u32, fraction: f64) -> u32 {
    let cell = FONT_5X7.height as f64;
    ((height as f64 * fraction / cell).round() as u32).max(1)
}

fn draw_overlay<PF>(ren: &mut RendererBase<PF>, overlay: &Overlay) -> Result<()>
where
    PF: PixelFormat<ColorType = Rgba8>,
{
    if let Some(path) = &overlay.font_path {
        #[cfg(feature = "font")]
        {
            return draw_overlay_ttf(ren, overlay, path);
        }
        #[cfg(not(feature = "font"))]
        log::warn!(
            "font_path {} ignored: built without the `font` feature",
            path.display()
        );
    }

    let (w, h) = (ren.width(), ren.height());
    let x = (w as f64 * TEXT_LEFT).round();
    let lines = [
        (&overlay.title, TITLE_TOP, TITLE_SIZE, true),
        (&overlay.subtitle, SUBTITLE_TOP, SUBTITLE_SIZE, false),
    ];
    for (text, top, size, bold) in lines {
        let Some(text) = text else { continue };
        let mut glyph = GlyphRasterBin::new(&FONT_5X7, text_scale(h, size));
        let baseline = (h as f64 * top).round() + glyph.base_line() - 1.0;
        render_raster_htext_solid(ren, &mut glyph, x, baseline, text, &overlay.color, bold);
    }
    Ok(())
}

#[cfg(feature = "font")]
fn draw_overlay_ttf<PF>(
    ren: &mut RendererBase<PF>,
    overlay: &Overlay,
    path: &std::path::Path,
) -> Result<()>
where
    PF: PixelFormat<ColorType = Rgba8>,
{
    use crate::font_engine::FontEngine;

    let mut engine = FontEngine::load(path)?;
    let (w, h) = (ren.width() as f64, ren.height() as f64);
    let x = (w * TEXT_LEFT).round();
    let mut ras = RasterizerScanlineAa::new();
    let mut sl = ScanlineU8::new();

    let lines = [
        (&overlay.title, TITLE_TOP, TITLE_SIZE, true),
        (&overlay.subtitle, SUBTITLE_TOP, SUBTITLE_SIZE, false),
    ];
    for (text, top, size, bold) in lines {
        let Some(text) = text else { continue };
        engine.set_height(h * size);
        let passes: &[f64] = if bold { &[0.0, 1.0] } else { &[0.0] };
        for &dx in passes {
            ras.reset();
            engine.add_text(&mut ras, x + dx * (h * size / 24.0).max(1.0), h * top, text)?;
            render_scanlines_aa_solid(&mut ras, &mut sl, ren, &overlay.color);
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_RADIUS;
    use crate::error::Error;

    fn quiet(seed: u64) -> PosterConfig {
        PosterConfig {
            seed: Some(seed),
            width: 200,
            height: 250,
            blob_count: 6,
            radius_min: 10.0,
            radius_max: 30.0,
            title: None,
            subtitle: None,
            ..PosterConfig::default()
        }
    }

    #[test]
    fn test_render_counts_and_dimensions() {
        let canvas = render(&quiet(1)).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (200, 250));
        assert_eq!(canvas.blobs().len(), 6);
        assert!(canvas.overlay().is_none());
        assert!(canvas.outline().is_none());
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = render(&quiet(42)).unwrap();
        let b = render(&quiet(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rasterize().unwrap(), b.rasterize().unwrap());
        let c = render(&quiet(43)).unwrap();
        assert_ne!(a.blobs(), c.blobs());
    }

    #[test]
    fn test_render_with_rng_matches_seeded_render() {
        let mut rng = Pcg64::seed_from_u64(5);
        let config = PosterConfig {
            seed: None,
            ..quiet(0)
        };
        let a = render_with_rng(&config, &mut rng).unwrap();
        let b = render(&quiet(5)).unwrap();
        assert_eq!(a.blobs(), b.blobs());
    }

    #[test]
    fn test_centres_radii_and_colours() {
        let canvas = render(&quiet(9)).unwrap();
        for blob in canvas.blobs() {
            let c = blob.center();
            assert!((0.0..200.0).contains(&c.x) && (0.0..250.0).contains(&c.y));
            assert!((10.0..=30.0).contains(&blob.radius()));
            assert!(crate::palette::MINIMAL.contains(&blob.color()));
            assert_eq!(blob.samples(), 100);
        }
    }

    #[test]
    fn test_invalid_config_produces_no_canvas() {
        let config = PosterConfig {
            radius_min: 5.0,
            radius_max: 1.0,
            ..quiet(0)
        };
        assert!(matches!(render(&config), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_zero_blobs_gives_plain_background() {
        let config = PosterConfig {
            blob_count: 0,
            background: "#336699".into(),
            ..quiet(3)
        };
        let rb = render(&config).unwrap().rasterize().unwrap();
        assert!(rb
            .as_bytes()
            .chunks_exact(4)
            .all(|p| p == [0x33, 0x66, 0x99, 0xff]));
    }

    #[test]
    fn test_blob_centre_is_tinted() {
        let canvas = render(&quiet(11)).unwrap();
        let rb = canvas.rasterize().unwrap();
        let blob = &canvas.blobs()[canvas.blobs().len() - 1];
        let c = blob.center();
        let off = c.y as usize * rb.stride() + c.x as usize * 4;
        assert_ne!(&rb.as_bytes()[off..off + 3], &[255, 255, 255]);
    }

    #[test]
    fn test_outline_adds_dark_pixels() {
        let plain = render(&quiet(4)).unwrap().rasterize().unwrap();
        let config = PosterConfig {
            outline_width: 3.0,
            outline_color: "#000000".into(),
            ..quiet(4)
        };
        let canvas = render(&config).unwrap();
        assert_eq!(canvas.outline().map(|o| o.width), Some(3.0));
        let outlined = canvas.rasterize().unwrap();
        let dark = |rb: &RenderingBuffer| {
            rb.as_bytes()
                .chunks_exact(4)
                .filter(|p| p[0] < 40 && p[1] < 40 && p[2] < 40)
                .count()
        };
        assert_eq!(dark(&plain), 0);
        assert!(dark(&outlined) > 30);
    }

    #[test]
    fn test_overlay_text_draws_in_top_left() {
        let config = PosterConfig {
            blob_count: 0,
            width: 400,
            height: 500,
            ..PosterConfig::default()
        };
        let canvas = render(&config).unwrap();
        let overlay = canvas.overlay().unwrap();
        assert_eq!(overlay.title.as_deref(), Some("Generative Poster"));
        let rb = canvas.rasterize().unwrap();

        let mut ink = Vec::new();
        for y in 0..rb.height() {
            for (x, p) in rb.row_slice(y).chunks_exact(4).enumerate() {
                if p[0] < 128 {
                    ink.push((x as u32, y));
                }
            }
        }
        assert!(!ink.is_empty());
        assert!(ink.iter().all(|&(x, y)| x >= 10 && y >= 25 && y < 120));
    }

    #[test]
    fn test_text_scale() {
        assert_eq!(text_scale(1000, TITLE_SIZE), 3);
        assert_eq!(text_scale(1000, SUBTITLE_SIZE), 2);
        assert_eq!(text_scale(50, SUBTITLE_SIZE), 1);
    }

    fn disc(x: f64, y: f64, radius: f64, samples: u32, color: Rgba8) -> Blob {
        let noise = crate::noise::NoiseKind::Uniform.sampler(0.0).unwrap();
        let mut rng = Pcg64::seed_from_u64(0);
        Blob::synthesize(PointD::new(x, y), radius, samples, color, 1.0, &noise, &mut rng)
            .unwrap()
    }

    fn pixel(rb: &RenderingBuffer, x: u32, y: u32) -> [u8; 4] {
        let off = x as usize * 4;
        let mut p = [0; 4];
        p.copy_from_slice(&rb.row_slice(y)[off..off + 4]);
        p
    }

    #[test]
    fn test_later_blob_covers_earlier_one() {
        let red = Rgba8::rgb(220, 20, 20);
        let blue = Rgba8::rgb(20, 20, 220);
        let paint = |first: Rgba8, second: Rgba8| {
            let mut canvas = Canvas::new(20, 20, Rgba8::WHITE);
            canvas.push_blob(disc(8.0, 10.0, 6.0, 64, first));
            canvas.push_blob(disc(12.0, 10.0, 6.0, 64, second));
            canvas.rasterize().unwrap()
        };

        let rb = paint(red, blue);
        assert_eq!(pixel(&rb, 10, 10), [20, 20, 220, 255]);
        assert_eq!(pixel(&rb, 4, 10), [220, 20, 20, 255]);

        let rb = paint(blue, red);
        assert_eq!(pixel(&rb, 10, 10), [220, 20, 20, 255]);
        assert_eq!(pixel(&rb, 15, 10), [220, 20, 20, 255]);
    }

    #[test]
    fn test_huge_blob_fills_small_canvas() {
        let color = Rgba8::rgb(30, 140, 90);
        let mut canvas = Canvas::new(20, 20, Rgba8::WHITE);
        canvas.push_blob(disc(10.0, 10.0, MAX_RADIUS, 4096, color));
        canvas.set_outline(Some(Outline {
            width: 2.0,
            color: Rgba8::BLACK,
        }));
        let started = std::time::Instant::now();
        let rb = canvas.rasterize().unwrap();
        assert!(started.elapsed().as_secs() < 5);
        assert!(rb
            .as_bytes()
            .chunks_exact(4)
            .all(|p| p == [30, 140, 90, 255]));
    }

    #[test]
    fn test_radius_above_limit_is_rejected() {
        let config = PosterConfig {
            width: 20,
            height: 20,
            blob_count: 1,
            radius_min: MAX_RADIUS,
            radius_max: MAX_RADIUS * 8.0,
            ..quiet(0)
        };
        assert!(matches!(render(&config), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_offcanvas_blobs_are_skipped() {
        let mut canvas = Canvas::new(20, 20, Rgba8::WHITE);
        let far = disc(-100.0, 10.0, 12.0, 32, Rgba8::BLACK);
        assert!(!canvas.overlaps(&far, 0.0));
        assert!(canvas.overlaps(&far, 100.0));
        assert!(canvas.overlaps(&disc(25.0, 10.0, 12.0, 32, Rgba8::BLACK), 0.0));
        canvas.push_blob(far);
        assert!(canvas
            .rasterize()
            .unwrap()
            .as_bytes()
            .chunks_exact(4)
            .all(|p| p == [255, 255, 255, 255]));
    }

    #[test]
    fn test_offcanvas_blobs_are_clipped() {
        let mut canvas = Canvas::new(20, 20, Rgba8::WHITE);
        let noise = crate::noise::NoiseKind::Uniform.sampler(0.0).unwrap();
        let mut rng = Pcg64::seed_from_u64(0);
        for (x, y) in [(-5.0, -5.0), (25.0, 10.0), (10.0, 1000.0)] {
            canvas.push_blob(
                Blob::synthesize(
                    PointD::new(x, y),
                    12.0,
                    32,
                    Rgba8::BLACK,
                    1.0,
                    &noise,
                    &mut rng,
                )
                .unwrap(),
            );
        }
        let rb = canvas.rasterize().unwrap();
        assert_eq!(&rb.row_slice(0)[..4], &[0, 0, 0, 255]);
        assert_eq!(&rb.row_slice(10)[19 * 4..], &[0, 0, 0, 255]);
    }
}
