use blob_poster::config::MAX_CANVAS_SIDE;
use blob_poster::{NoiseKind, PosterConfig, RenderingBuffer, Rgba8};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use wasm_bindgen::prelude::*;

/// Render a poster into an RGBA pixel buffer.
///
/// `params` is positional, and missing entries keep their defaults:
/// `[seed, blob_count, radius_min, radius_max, wobble, samples, alpha,
/// outline_width, normal_noise]`. A negative seed draws from `Math.random`.
///
/// Returns `width * height * 4` bytes. The frontend copies them into an
/// ImageData for canvas display. Rejected parameters produce a flat grey
/// buffer.
#[wasm_bindgen]
pub fn render_poster(width: u32, height: u32, params: &[f64], palette: &str) -> Vec<u8> {
    let config = poster_config(width, height, params, palette);
    match rasterize_config(&config, js_rng) {
        Ok(rbuf) => rbuf.into_bytes(),
        Err(e) => {
            log::warn!("render_poster: {}", e);
            fallback(width, height)
        }
    }
}

/// Names of the built-in palettes.
#[wasm_bindgen]
pub fn palette_names() -> js_sys::Array {
    blob_poster::palette::names()
        .into_iter()
        .map(JsValue::from_str)
        .collect()
}

/// Get the library version string.
#[wasm_bindgen]
pub fn version() -> String {
    format!("blob-poster {}", env!("CARGO_PKG_VERSION"))
}

/// Render `config`, calling `entropy` for a generator only when it has no
/// seed.
fn rasterize_config(
    config: &PosterConfig,
    entropy: impl FnOnce() -> Pcg64,
) -> blob_poster::Result<RenderingBuffer> {
    let canvas = match config.seed {
        Some(_) => blob_poster::render(config)?,
        None => blob_poster::render_with_rng(config, &mut entropy())?,
    };
    canvas.rasterize()
}

/// PCG generator seeded from two `Math.random` draws.
fn js_rng() -> Pcg64 {
    let hi = js_sys::Math::random().to_bits();
    let lo = js_sys::Math::random().to_bits();
    Pcg64::seed_from_u64(hi.rotate_left(32) ^ lo)
}

fn poster_config(width: u32, height: u32, params: &[f64], palette: &str) -> PosterConfig {
    let d = PosterConfig::default();
    let p = |i: usize, default: f64| params.get(i).copied().unwrap_or(default);

    let seed = p(0, -1.0);
    PosterConfig {
        seed: (seed >= 0.0).then_some(seed as u64),
        width: i64::from(width),
        height: i64::from(height),
        blob_count: p(1, d.blob_count as f64) as i64,
        radius_min: p(2, d.radius_min),
        radius_max: p(3, d.radius_max),
        wobble: p(4, d.wobble),
        samples: p(5, d.samples as f64) as i64,
        alpha: p(6, d.alpha),
        outline_width: p(7, d.outline_width),
        noise: if p(8, 0.0) > 0.5 {
            NoiseKind::Normal
        } else {
            NoiseKind::Uniform
        },
        palette: palette.to_string(),
        ..d
    }
}

fn fallback(width: u32, height: u32) -> Vec<u8> {
    let side = MAX_CANVAS_SIDE as u32;
    if width > side || height > side {
        return Vec::new();
    }
    let grey = Rgba8::rgb(200, 200, 200);
    let mut rbuf = RenderingBuffer::new(width, height);
    for y in 0..height {
        for px in rbuf.row_slice_mut(y).chunks_exact_mut(4) {
            px.copy_from_slice(&[grey.r, grey.g, grey.b, grey.a]);
        }
    }
    rbuf.into_bytes()
}
