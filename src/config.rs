use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::color::Rgb;
use crate::combination::NamingMode;
use crate::fitter::{RenderSpec, DEFAULT_CANVAS_SIZE, DEFAULT_INITIAL_FONT_SIZE};
use crate::font_locator::{parse_sha256_pin, DEFAULT_FONT_FAMILY};
use crate::ranges::{letter_range, number_range};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LABELGRID_GIT_HASH"),
    ")"
);

#[derive(Debug, Clone, Parser)]
#[command(name = "labelgrid")]
#[command(version = VERSION)]
#[command(about = "Generate outlined letter/number tiles and a base64 PNG manifest")]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// First letter of the range (A, Z, AA, -C, ...)
    #[arg(long = "start_letter", default_value = "A", allow_hyphen_values = true)]
    pub start_letter: String,

    /// Last letter of the range
    #[arg(long = "end_letter", default_value = "Z", allow_hyphen_values = true)]
    pub end_letter: String,

    #[arg(long = "start_number", default_value_t = 1)]
    pub start_number: i64,

    #[arg(long = "end_number", default_value_t = 26)]
    pub end_number: i64,

    /// Outline radius in pixels
    #[arg(long = "contour_thickness", default_value_t = 1)]
    pub contour_thickness: u32,

    /// Also write every tile as <output_dir>/<label>.png
    #[arg(long = "export_png")]
    pub export_png: bool,

    #[arg(long = "text_color", default_value = "#000000")]
    pub text_color: String,

    #[arg(long = "contour_color", default_value = "#FFFFFF")]
    pub contour_color: String,

    #[arg(long = "output_dir", default_value = "images")]
    pub output_dir: PathBuf,

    #[arg(long = "output_json", default_value = "output.json")]
    pub output_json: PathBuf,

    /// How manifest names are derived: escaped (neg_C_neg_3) or raw (-C-3)
    #[arg(long = "naming_mode", value_enum, default_value_t = NamingMode::Escaped)]
    pub naming_mode: NamingMode,

    /// Load this font file instead of searching the system fonts
    #[arg(long = "font_path")]
    pub font_path: Option<PathBuf>,

    /// Refuse to render unless the font file has this sha256
    #[arg(long = "font_sha256")]
    pub font_sha256: Option<String>,

    /// Print the full name and path of every font the locator can see, then exit
    #[arg(long = "list_fonts")]
    pub list_fonts: bool,
}

/// Where the font comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSelection {
    pub family: String,
    pub path_override: Option<PathBuf>,
    pub sha256: Option<String>,
}

/// Everything a run needs, validated once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub letters: Vec<String>,
    pub numbers: Vec<i64>,
    pub render: RenderSpec,
    pub naming_mode: NamingMode,
    pub export_dir: Option<PathBuf>,
    pub output_json: PathBuf,
    pub font: FontSelection,
}

impl RunConfig {
    /// Colours are checked before letters, matching the startup order of
    /// fatal errors.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let text_color = Rgb::from_hex(&cli.text_color).context("invalid --text_color")?;
        let outline_color =
            Rgb::from_hex(&cli.contour_color).context("invalid --contour_color")?;
        let sha256 = cli
            .font_sha256
            .as_deref()
            .map(parse_sha256_pin)
            .transpose()?;

        let letters = letter_range(&cli.start_letter, &cli.end_letter)?;
        let numbers = number_range(cli.start_number, cli.end_number);

        Ok(Self {
            letters,
            numbers,
            render: RenderSpec {
                canvas_size: DEFAULT_CANVAS_SIZE,
                initial_font_size: DEFAULT_INITIAL_FONT_SIZE,
                outline_thickness: cli.contour_thickness,
                text_color,
                outline_color,
            },
            naming_mode: cli.naming_mode,
            export_dir: cli.export_png.then(|| cli.output_dir.clone()),
            output_json: cli.output_json.clone(),
            font: FontSelection {
                family: DEFAULT_FONT_FAMILY.to_owned(),
                path_override: cli.font_path.clone(),
                sha256,
            },
        })
    }
}
