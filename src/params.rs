//! Parameter translation between CLI inputs and provider-facing values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output aspect ratio of the generated banner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Square.
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// Wide landscape.
    #[serde(rename = "16:9")]
    Landscape,
    /// Tall portrait.
    #[serde(rename = "9:16")]
    Portrait,
    /// Classic landscape.
    #[serde(rename = "4:3")]
    Standard,
    /// Classic portrait.
    #[serde(rename = "3:4")]
    StandardPortrait,
}

impl AspectRatio {
    /// Every supported ratio, in menu order.
    pub const ALL: [Self; 5] =
        [Self::Square, Self::Landscape, Self::Portrait, Self::Standard, Self::StandardPortrait];

    /// Canonical `W:H` string sent to the provider.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Standard => "4:3",
            Self::StandardPortrait => "3:4",
        }
    }

    /// Menu label shown to the user.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Square => "1:1 (square)",
            Self::Landscape => "16:9 (landscape)",
            Self::Portrait => "9:16 (portrait)",
            Self::Standard => "4:3 (standard)",
            Self::StandardPortrait => "3:4 (standard portrait)",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    /// Accepts either the canonical ratio or its menu label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL.into_iter().find(|r| r.as_str() == s || r.label() == s).ok_or_else(|| {
            let valid: Vec<&str> = Self::ALL.iter().map(|r| r.as_str()).collect();
            format!("Unsupported aspect ratio '{s}'. Valid: {}", valid.join(", "))
        })
    }
}

/// Canned style instructions offered as one-click hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StylePreset {
    /// Soft pastel palette.
    Pastel,
    /// Black and gold premium look.
    Luxury,
    /// Minimal layout with plenty of whitespace.
    Simple,
    /// Vivid, energetic colors.
    Pop,
    /// Traditional Japanese patterns and washi texture.
    Japanese,
    /// Winter season motifs.
    Winter,
}

impl StylePreset {
    /// Style paragraph that replaces the free-form style text.
    #[must_use]
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Pastel => {
                "A soft, gentle design built on pastel colors. Add bright, diffused lighting \
                 to convey cuteness and happiness."
            }
            Self::Luxury => {
                "A chic, luxurious design using black, gold and deep tones. Use refined fonts \
                 and layout to emphasize that this is a premium gift."
            }
            Self::Simple => {
                "A minimal, polished design with no superfluous decoration. Make use of \
                 whitespace so the product images and text stand out in a clean composition."
            }
            Self::Pop => {
                "A pop design with vivid colors and an energetic feel. Include dynamic layouts \
                 or geometric patterns to create fun and excitement."
            }
            Self::Japanese => {
                "A calm Japanese-style design with washi paper texture and traditional patterns \
                 (asanoha, seigaiha). Express an elegant, understated atmosphere."
            }
            Self::Winter => {
                "A wintry design with snowflakes, sparkling light and a cool color palette. \
                 Create a dreamy atmosphere that brings out the warmth of a gift."
            }
        }
    }
}

/// Validate the output format parameter.
///
/// # Errors
///
/// Returns an error if the format is not recognized.
pub fn validate_format(format: &str) -> Result<(), String> {
    match format {
        "jpeg" | "png" | "webp" => Ok(()),
        _ => Err(format!("Unsupported format '{format}'. Valid: jpeg, png, webp")),
    }
}

/// Get the file extension for an output format.
#[must_use]
pub fn format_extension(format: &str) -> &'static str {
    match format {
        "jpeg" => "jpg",
        "webp" => "webp",
        _ => "png",
    }
}
