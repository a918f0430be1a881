//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{AspectRatio, StylePreset};

/// Gift selection banner generator: product photos + copy in, banner out.
#[derive(Parser, Debug)]
#[command(name = "giftgen", version, about)]
pub struct Cli {
    /// Product images to feature (PNG, JPEG or WebP), in display order.
    pub images: Vec<PathBuf>,

    /// Headline copy placed prominently on the banner.
    #[arg(short = 't', long)]
    pub main_text: Option<String>,

    /// Smaller complementary copy.
    #[arg(short = 'u', long)]
    pub sub_text: Option<String>,

    /// Free-form style or atmosphere instruction.
    #[arg(short, long, conflicts_with_all = ["style_file", "preset"])]
    pub style: Option<String>,

    /// Path to a file containing the style instruction.
    #[arg(long, conflicts_with = "preset")]
    pub style_file: Option<PathBuf>,

    /// Canned style instruction.
    #[arg(short, long, value_enum)]
    pub preset: Option<StylePreset>,

    /// Aspect ratio: 1:1, 16:9, 9:16, 4:3, 3:4 (or a label like "16:9 (landscape)").
    #[arg(short, long)]
    pub aspect_ratio: Option<AspectRatio>,

    /// Built-in reference template by name (see --list-templates).
    #[arg(short = 'T', long)]
    pub template: Option<String>,

    /// Your own reference design image; takes priority over --template.
    #[arg(short, long)]
    pub reference: Option<PathBuf>,

    /// Model name or short alias.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Download format: png, jpeg, webp.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Previously generated banner to refine instead of starting over.
    #[arg(long)]
    pub refine_from: Option<PathBuf>,

    /// What to change in a refinement round.
    #[arg(short = 'M', long, requires = "refine_from")]
    pub modify: Option<String>,

    /// After generating, keep reading modification requests from stdin.
    #[arg(short, long)]
    pub interactive: bool,

    /// List the built-in reference templates and exit.
    #[arg(long)]
    pub list_templates: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the style text from the flag, the file, or the preset.
    ///
    /// # Errors
    ///
    /// Returns an error if the style file cannot be read.
    pub fn resolve_style(&self) -> Result<String, std::io::Error> {
        if let Some(preset) = self.preset {
            Ok(preset.instruction().to_string())
        } else if let Some(ref path) = self.style_file {
            Ok(std::fs::read_to_string(path)?.trim().to_string())
        } else {
            Ok(self.style.clone().unwrap_or_default())
        }
    }
}
