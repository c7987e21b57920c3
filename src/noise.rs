//! Radius noise for blob synthesis.
//!
//! Each angular sample of a blob is pushed in or out by a relative amount
//! drawn from a [`NoiseSampler`]. Both distributions are bounded by the
//! wobble amplitude so every sampled radius stays within
//! `[r * (1 - wobble), r * (1 + wobble)]`.

use crate::error::{Error, Result};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distribution of the per-sample relative radius offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    /// Uniform in `[-wobble, wobble]`.
    #[default]
    Uniform,
    /// Gaussian with σ = wobble / 3, clamped to `[-wobble, wobble]`.
    Normal,
}

impl NoiseKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Normal => "normal",
        }
    }

    /// Build a sampler for the given wobble amplitude.
    pub fn sampler(self, wobble: f64) -> Result<NoiseSampler> {
        if !(0.0..=1.0).contains(&wobble) {
            return Err(Error::invalid(format!(
                "wobble must be within [0, 1], got {}",
                wobble
            )));
        }
        Ok(match self {
            Self::Uniform => NoiseSampler::Uniform { wobble },
            Self::Normal => NoiseSampler::Normal {
                dist: Normal::new(0.0, wobble / 3.0)
                    .map_err(|e| Error::invalid(format!("normal noise: {}", e)))?,
                wobble,
            },
        })
    }
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoiseKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "normal" | "gaussian" => Ok(Self::Normal),
            other => Err(format!("unknown noise kind '{}'", other)),
        }
    }
}

/// A ready-to-draw noise source.
#[derive(Debug, Clone, Copy)]
pub enum NoiseSampler {
    Uniform { wobble: f64 },
    Normal { dist: Normal<f64>, wobble: f64 },
}

impl NoiseSampler {
    pub fn wobble(&self) -> f64 {
        match *self {
            Self::Uniform { wobble } | Self::Normal { wobble, .. } => wobble,
        }
    }

    /// Draw one relative offset. Always consumes exactly one draw from `rng`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Uniform { wobble } => rng.gen_range(-wobble..=wobble),
            Self::Normal { dist, wobble } => dist.sample(rng).clamp(-wobble, wobble),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
