//! blob-poster - render generative blob posters from the command line.
//!
//! Usage:
//!   blob-poster render [--config poster.toml] [--seed 42] ... -o poster.png
//!   blob-poster palettes
//!   blob-poster config [--config poster.toml] [flags...]

use anyhow::{Context, Result};
use blob_poster::palette::{self, PaletteStyle};
use blob_poster::{NoiseKind, PosterConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Generative poster renderer
#[derive(Parser, Debug)]
#[command(name = "blob-poster", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a poster to PNG
    Render {
        #[command(flatten)]
        poster: PosterArgs,

        /// Output PNG path
        #[arg(short, long, value_name = "FILE", default_value = "poster.png")]
        output: PathBuf,
    },
    /// List the built-in palettes
    Palettes,
    /// Print the resolved configuration as TOML
    Config {
        #[command(flatten)]
        poster: PosterArgs,
    },
}

/// Poster parameters. Flags override values from `--config`.
#[derive(Args, Debug, Default)]
struct PosterArgs {
    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for reproducible output (0 to 2^63 - 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(0..=i64::MAX as u64))]
    seed: Option<u64>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<i64>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<i64>,

    /// Number of blobs
    #[arg(short = 'n', long)]
    blob_count: Option<i64>,

    /// Smallest base radius in pixels
    #[arg(long)]
    radius_min: Option<f64>,

    /// Largest base radius in pixels
    #[arg(long)]
    radius_max: Option<f64>,

    /// Noise amplitude as a fraction of the radius
    #[arg(long)]
    wobble: Option<f64>,

    /// Angular samples per blob
    #[arg(long)]
    samples: Option<i64>,

    /// Noise distribution (uniform or normal)
    #[arg(long)]
    noise: Option<NoiseKind>,

    /// Palette name (minimal, vivid, noisetouch)
    #[arg(short, long)]
    palette: Option<String>,

    /// Fill opacity
    #[arg(long)]
    alpha: Option<f64>,

    /// Background colour (#rrggbb)
    #[arg(long)]
    background: Option<String>,

    /// Outline ring width; 0 disables outlines
    #[arg(long)]
    outline_width: Option<f64>,

    /// Outline colour (#rrggbb)
    #[arg(long)]
    outline_color: Option<String>,

    /// Title text; empty for none
    #[arg(long)]
    title: Option<String>,

    /// Subtitle text; empty for none
    #[arg(long)]
    subtitle: Option<String>,

    /// Overlay text colour (#rrggbb)
    #[arg(long)]
    text_color: Option<String>,

    /// TrueType font for the overlay
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,
}

impl PosterArgs {
    /// Load the config file (or defaults) and apply flag overrides.
    fn resolve(self) -> Result<PosterConfig> {
        let mut c = match &self.config {
            Some(path) => PosterConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PosterConfig::default(),
        };

        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = self.$field { c.$field = v; })*
            };
        }
        apply!(
            width,
            height,
            blob_count,
            radius_min,
            radius_max,
            wobble,
            samples,
            noise,
            palette,
            alpha,
            background,
            outline_width,
            outline_color,
            text_color,
        );
        if self.seed.is_some() {
            c.seed = self.seed;
        }
        if self.title.is_some() {
            c.title = self.title;
        }
        if self.subtitle.is_some() {
            c.subtitle = self.subtitle;
        }
        if self.font.is_some() {
            c.font_path = self.font;
        }
        Ok(c)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Render { poster, output } => {
            let config = poster.resolve()?;
            let canvas = blob_poster::render(&config).context("rendering poster")?;
            let rbuf = canvas.rasterize().context("rasterizing poster")?;
            let path = blob_poster::write_png(&output, &rbuf)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("{}", path.display());
        }
        Command::Palettes => {
            for style in PaletteStyle::ALL {
                let colors: Vec<String> = style
                    .palette()
                    .colors
                    .iter()
                    .map(|c| c.to_string())
                    .collect();
                println!("{:<12} {}", style.name(), colors.join(" "));
            }
            log::debug!("{} palettes, fallback {}", palette::names().len(), palette::FALLBACK.name);
        }
        Command::Config { poster } => {
            let config = poster.resolve()?;
            config.validate().context("invalid configuration")?;
            print!("{}", config.to_toml_string()?);
        }
    }
    Ok(())
}
