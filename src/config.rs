//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::adapters::live::gemini::GEMINI_API_BASE;
use crate::model::DEFAULT_MODEL;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Endpoint and network settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Default values for CLI options that were not given.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Reference template catalog.
    #[serde(default)]
    pub templates: TemplatesConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Endpoint and network settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint prefix; `/{model}:generateContent` is appended.
    pub base_url: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: GEMINI_API_BASE.to_string(), timeout_secs: 120 }
    }
}

impl ApiConfig {
    /// The request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Default parameter values from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default model name or alias.
    pub model: String,
    /// Default headline copy.
    pub main_text: String,
    /// Default secondary copy.
    pub sub_text: String,
    /// Default aspect ratio.
    pub aspect_ratio: String,
    /// Default output format.
    pub format: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            main_text: "Choose Your Gift".to_string(),
            sub_text: "Recipients pick the item they like best".to_string(),
            aspect_ratio: "1:1".to_string(),
            format: "png".to_string(),
        }
    }
}

/// Reference template catalog: named image files under one directory.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory the template files are resolved against.
    pub dir: PathBuf,
    /// Named templates.
    pub entries: Vec<TemplateEntry>,
}

/// One named template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateEntry {
    /// Name used with `--template`.
    pub name: String,
    /// File name relative to the template directory.
    pub file: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        let entry = |name: &str, file: &str| TemplateEntry { name: name.into(), file: file.into() };
        Self {
            dir: PathBuf::from("templates"),
            entries: vec![
                entry("a", "template_1.jpg"),
                entry("b", "template_2.jpg"),
                entry("c", "template_3.png"),
                entry("d", "template_4.jpg"),
            ],
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the Gemini API key, preferring environment variables.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        ["GOOGLE_API_KEY", "GEMINI_API_KEY"]
            .into_iter()
            .find_map(|var| std::env::var(var).ok())
            .or_else(|| self.keys.gemini.clone())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `GIFTGEN_CONFIG` environment variable
/// 3. `~/.config/giftgen/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("GIFTGEN_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/giftgen/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/giftgen/config.toml")
    } else {
        PathBuf::from("giftgen.toml")
    }
}
