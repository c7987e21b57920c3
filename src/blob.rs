//! Wobbly blob polygons.
//!
//! A blob is a circle sampled at evenly spaced angles whose radius is
//! perturbed independently at every sample. [`Blob::path`] exposes it to
//! the rasterizer as a vertex source emitting one closed contour.

use crate::basics::{
    PointD, VertexSource, PATH_CMD_END_POLY, PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP,
    PATH_FLAGS_CLOSE, PI,
};
use crate::color::Rgba8;
use crate::error::{Error, Result};
use crate::noise::NoiseSampler;
use rand::Rng;

/// Fewest angular samples that still form a polygon.
pub const MIN_SAMPLES: u32 = 3;

/// A closed irregular polygon with its generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    center: PointD,
    radius: f64,
    wobble: f64,
    color: Rgba8,
    alpha: f64,
    points: Vec<PointD>,
}

impl Blob {
    /// Sample `samples` points around `center`.
    ///
    /// Point `i` sits at angle `2πi / samples` with radius
    /// `radius * (1 + n_i)`, drawing `n_i` from `noise` in order.
    pub fn synthesize<R: Rng>(
        center: PointD,
        radius: f64,
        samples: u32,
        color: Rgba8,
        alpha: f64,
        noise: &NoiseSampler,
        rng: &mut R,
    ) -> Result<Self> {
        if samples < MIN_SAMPLES {
            return Err(Error::invalid(format!(
                "a blob needs at least {} samples, got {}",
                MIN_SAMPLES, samples
            )));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::invalid(format!(
                "blob radius must be positive, got {}",
                radius
            )));
        }

        let points = (0..samples)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / samples as f64;
                let r = radius * (1.0 + noise.sample(rng));
                PointD::new(center.x + r * theta.cos(), center.y + r * theta.sin())
            })
            .collect();

        Ok(Self {
            center,
            radius,
            wobble: noise.wobble(),
            color,
            alpha: alpha.clamp(0.0, 1.0),
            points,
        })
    }

    pub fn center(&self) -> PointD {
        self.center
    }

    /// Base radius before noise.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn samples(&self) -> usize {
        self.points.len()
    }

    pub fn wobble(&self) -> f64 {
        self.wobble
    }

    /// Palette colour, without the fill alpha applied.
    pub fn color(&self) -> Rgba8 {
        self.color
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Colour actually blended: palette colour with its alpha scaled by `alpha`.
    pub fn fill_color(&self) -> Rgba8 {
        self.color
            .with_opacity(Rgba8::to_double(self.color.a) * self.alpha)
    }

    pub fn points(&self) -> &[PointD] {
        &self.points
    }

    /// Distance of each point from the centre.
    pub fn sample_radii(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(move |p| p.distance(&self.center))
    }

    /// Vertex source over the polygon.
    pub fn path(&self) -> BlobPath<'_> {
        BlobPath {
            points: &self.points,
            step: 0,
        }
    }

    /// Axis-aligned bounds as (min, max) corners.
    pub fn bounds(&self) -> (PointD, PointD) {
        self.points.iter().fold(
            (
                PointD::new(f64::INFINITY, f64::INFINITY),
                PointD::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(lo, hi), p| {
                (
                    PointD::new(lo.x.min(p.x), lo.y.min(p.y)),
                    PointD::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            },
        )
    }
}

/// Borrowed vertex source over a blob's points.
pub struct BlobPath<'a> {
    points: &'a [PointD],
    step: usize,
}

impl VertexSource for BlobPath<'_> {
    fn rewind(&mut self, _path_id: u32) {
        self.step = 0;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        let n = self.points.len();
        if self.step == n {
            self.step += 1;
            return PATH_CMD_END_POLY | PATH_FLAGS_CLOSE;
        }
        if self.step > n {
            return PATH_CMD_STOP;
        }
        let p = self.points[self.step];
        *x = p.x;
        *y = p.y;
        self.step += 1;
        if self.step == 1 {
            PATH_CMD_MOVE_TO
        } else {
            PATH_CMD_LINE_TO
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
