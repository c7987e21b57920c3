//! Poster configuration.
//!
//! [`PosterConfig`] is the raw parameter record as it arrives from a TOML
//! file, CLI flags or the WASM demo. Counts and sizes are signed so that
//! nonsense like `blob_count = -1` reaches [`PosterConfig::validate`] and is
//! rejected there instead of failing inside the deserializer.
//! [`PosterParams`] is the checked, typed form the renderer consumes.

use crate::blob::MIN_SAMPLES;
use crate::color::Rgba8;
use crate::error::{Error, Result};
use crate::noise::NoiseKind;
use crate::palette::{self, Palette};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest accepted canvas side in pixels.
pub const MAX_CANVAS_SIDE: i64 = 16_384;
/// Largest accepted base radius in pixels. With wobble at most 1, blob
/// vertices stay well inside the 24.8 fixed-point range of the rasterizer.
pub const MAX_RADIUS: f64 = 4.0 * MAX_CANVAS_SIDE as f64;
/// Largest accepted blob count.
pub const MAX_BLOBS: i64 = 10_000;
/// Largest accepted number of angular samples per blob.
pub const MAX_SAMPLES: i64 = 4_096;

pub const DEFAULT_TITLE: &str = "Generative Poster";
pub const DEFAULT_SUBTITLE: &str = "Week 2 Arts & Advanced Big Data";

/// Raw poster parameters. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PosterConfig {
    /// Seed for reproducible output; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Canvas width in pixels
    pub width: i64,
    /// Canvas height in pixels
    pub height: i64,
    pub blob_count: i64,
    /// Smallest base radius in pixels
    pub radius_min: f64,
    /// Largest base radius in pixels
    pub radius_max: f64,
    /// Noise amplitude as a fraction of the radius, in [0, 1]
    pub wobble: f64,
    /// Angular samples per blob
    pub samples: i64,
    pub noise: NoiseKind,
    /// Palette name; unknown names fall back to grey
    pub palette: String,
    /// Fill opacity in [0, 1]
    pub alpha: f64,
    /// `#rrggbb` or `#rrggbbaa`
    pub background: String,
    /// Outline ring width in pixels; 0 disables outlines
    pub outline_width: f64,
    pub outline_color: String,
    /// Bold headline; empty string for none
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub text_color: String,
    /// TrueType/OpenType font for the overlay (requires the `font` feature)
    pub font_path: Option<PathBuf>,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            seed: None,
            width: 800,
            height: 1000,
            blob_count: 25,
            radius_min: 50.0,
            radius_max: 150.0,
            wobble: 0.08,
            samples: 100,
            noise: NoiseKind::Uniform,
            palette: "minimal".to_string(),
            alpha: 0.6,
            background: "#ffffff".to_string(),
            outline_width: 0.0,
            outline_color: "#000000".to_string(),
            title: Some(DEFAULT_TITLE.to_string()),
            subtitle: Some(DEFAULT_SUBTITLE.to_string()),
            text_color: "#000000".to_string(),
            font_path: None,
        }
    }
}

impl PosterConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::invalid(format!("config: {}", e)))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::invalid(format!("config: {}", e)))
    }

    /// Check every field and produce the typed parameter set.
    pub fn validate(&self) -> Result<PosterParams> {
        let width = canvas_side("width", self.width)?;
        let height = canvas_side("height", self.height)?;

        if !(0..=MAX_BLOBS).contains(&self.blob_count) {
            return Err(Error::invalid(format!(
                "blob_count must be within 0..={}, got {}",
                MAX_BLOBS, self.blob_count
            )));
        }

        for (name, r) in [("radius_min", self.radius_min), ("radius_max", self.radius_max)] {
            if !(r.is_finite() && r > 0.0 && r <= MAX_RADIUS) {
                return Err(Error::invalid(format!(
                    "{} must be within (0, {}], got {}",
                    name, MAX_RADIUS, r
                )));
            }
        }
        if self.radius_min > self.radius_max {
            return Err(Error::invalid(format!(
                "radius_min ({}) is greater than radius_max ({})",
                self.radius_min, self.radius_max
            )));
        }

        if !(0.0..=1.0).contains(&self.wobble) {
            return Err(Error::invalid(format!(
                "wobble must be within [0, 1], got {}",
                self.wobble
            )));
        }

        if !(i64::from(MIN_SAMPLES)..=MAX_SAMPLES).contains(&self.samples) {
            return Err(Error::invalid(format!(
                "samples must be within {}..={}, got {}",
                MIN_SAMPLES, MAX_SAMPLES, self.samples
            )));
        }

        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::invalid(format!(
                "alpha must be within [0, 1], got {}",
                self.alpha
            )));
        }

        if !(self.outline_width.is_finite() && self.outline_width >= 0.0) {
            return Err(Error::invalid(format!(
                "outline_width must be a non-negative number, got {}",
                self.outline_width
            )));
        }

        Ok(PosterParams {
            seed: self.seed,
            width,
            height,
            blob_count: self.blob_count as usize,
            radius_min: self.radius_min,
            radius_max: self.radius_max,
            wobble: self.wobble,
            samples: self.samples as u32,
            noise: self.noise,
            background: parse_color("background", &self.background)?,
            outline_width: self.outline_width,
            outline_color: parse_color("outline_color", &self.outline_color)?,
            title: non_empty(&self.title),
            subtitle: non_empty(&self.subtitle),
            text_color: parse_color("text_color", &self.text_color)?,
            font_path: self.font_path.clone(),
            alpha: self.alpha,
            palette: palette::lookup(&self.palette),
        })
    }
}

fn canvas_side(name: &str, v: i64) -> Result<u32> {
    if !(1..=MAX_CANVAS_SIDE).contains(&v) {
        return Err(Error::invalid(format!(
            "{} must be within 1..={}, got {}",
            name, MAX_CANVAS_SIDE, v
        )));
    }
    Ok(v as u32)
}

fn parse_color(name: &str, s: &str) -> Result<Rgba8> {
    Rgba8::from_hex(s).ok_or_else(|| {
        Error::invalid(format!(
            "{} must be #rrggbb or #rrggbbaa, got '{}'",
            name, s
        ))
    })
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

// ============================================================================
// PosterParams
// ============================================================================

/// Validated poster parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterParams {
    pub seed: Option<u64>,
    pub width: u32,
    pub height: u32,
    pub blob_count: usize,
    pub radius_min: f64,
    pub radius_max: f64,
    pub wobble: f64,
    pub samples: u32,
    pub noise: NoiseKind,
    pub palette: &'static Palette,
    pub alpha: f64,
    pub background: Rgba8,
    pub outline_width: f64,
    pub outline_color: Rgba8,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub text_color: Rgba8,
    pub font_path: Option<PathBuf>,
}

// ============================================================================
// Tests
// ============================================================================
