//! Named colour palettes.
//!
//! Palettes are static tables. Lookup is by case-insensitive name; an
//! unknown name resolves to a single-colour grey fallback and logs a warning.

use crate::color::Rgba8;
use std::fmt;
use std::str::FromStr;

/// A named, ordered colour table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub colors: &'static [Rgba8],
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, c: &Rgba8) -> bool {
        self.colors.contains(c)
    }
}

pub static MINIMAL: Palette = Palette {
    name: "minimal",
    colors: &[
        Rgba8::rgb(255, 179, 186),
        Rgba8::rgb(255, 223, 186),
        Rgba8::rgb(255, 255, 186),
        Rgba8::rgb(186, 255, 201),
        Rgba8::rgb(186, 225, 255),
    ],
};

pub static VIVID: Palette = Palette {
    name: "vivid",
    colors: &[
        Rgba8::rgb(255, 153, 153),
        Rgba8::rgb(255, 204, 153),
        Rgba8::rgb(255, 255, 153),
        Rgba8::rgb(153, 255, 204),
        Rgba8::rgb(153, 204, 255),
    ],
};

pub static NOISE_TOUCH: Palette = Palette {
    name: "noisetouch",
    colors: &[
        Rgba8::rgb(230, 180, 180),
        Rgba8::rgb(230, 210, 180),
        Rgba8::rgb(230, 230, 180),
        Rgba8::rgb(180, 230, 210),
        Rgba8::rgb(180, 210, 230),
    ],
};

/// Used for any unrecognised palette name.
pub static FALLBACK: Palette = Palette {
    name: "fallback",
    colors: &[Rgba8::rgb(200, 200, 200)],
};

// ============================================================================
// PaletteStyle
// ============================================================================

/// The built-in palette styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteStyle {
    Minimal,
    Vivid,
    NoiseTouch,
}

impl PaletteStyle {
    pub const ALL: [PaletteStyle; 3] = [Self::Minimal, Self::Vivid, Self::NoiseTouch];

    pub fn palette(self) -> &'static Palette {
        match self {
            Self::Minimal => &MINIMAL,
            Self::Vivid => &VIVID,
            Self::NoiseTouch => &NOISE_TOUCH,
        }
    }

    pub fn name(self) -> &'static str {
        self.palette().name
    }
}

impl fmt::Display for PaletteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaletteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        Self::ALL
            .into_iter()
            .find(|style| style.name() == key)
            .ok_or_else(|| format!("unknown palette style '{}'", s))
    }
}

/// Resolve a palette by name, falling back to [`FALLBACK`] with a warning.
pub fn lookup(name: &str) -> &'static Palette {
    match name.parse::<PaletteStyle>() {
        Ok(style) => style.palette(),
        Err(_) => {
            log::warn!(
                "unknown palette '{}', using grey fallback (known: {})",
                name,
                names().join(", ")
            );
            &FALLBACK
        }
    }
}

/// Names of the built-in palettes, in declaration order.
pub fn names() -> Vec<&'static str> {
    PaletteStyle::ALL.iter().map(|s| s.name()).collect()
}

// ============================================================================
// Tests
// ============================================================================
