//! Saving the downloadable copy of a generated banner.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::AppError;
use crate::image_source::ImageSource;
use crate::params::format_extension;

/// Generate an output filename from the banner's headline and format.
///
/// Sanitizes the first 40 characters of the headline to kebab-case,
/// appends a unix timestamp, and adds the appropriate file extension.
#[must_use]
pub fn auto_filename(main_text: &str, format: &str) -> String {
    let sanitized = sanitize_for_filename(main_text, 40);
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    let ext = format_extension(format);
    format!("{sanitized}-{timestamp}.{ext}")
}

/// Reduce free text to a lowercase, hyphen-joined file stem.
///
/// Runs of anything other than ASCII letters and digits become one hyphen.
/// Text with nothing usable yields `gift-banner`.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut stem = input
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    stem.truncate(max_len);
    let stem = stem.trim_end_matches('-');

    if stem.is_empty() {
        "gift-banner".to_string()
    } else {
        stem.to_string()
    }
}

/// Resolve the output path: use explicit path or auto-generate.
#[must_use]
pub fn resolve_output_path(explicit: Option<&Path>, main_text: &str, format: &str) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(auto_filename(main_text, format)),
    }
}

/// Path for the `round`-th refinement of `base`: `banner.png` → `banner-r2.png`.
#[must_use]
pub fn refinement_path(base: &Path, round: usize) -> PathBuf {
    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    match base.extension() {
        Some(ext) => base.with_file_name(format!("{stem}-r{round}.{}", ext.to_string_lossy())),
        None => base.with_file_name(format!("{stem}-r{round}")),
    }
}

/// Write the downloadable copy of `image` in `target_format`.
///
/// Bytes are written untouched when the provider already returned that
/// format; otherwise they are re-encoded with the `image` crate.
///
/// # Errors
///
/// Returns an error if the file cannot be written or re-encoding fails.
pub fn save_image(image: &ImageSource, target_format: &str, path: &Path) -> Result<(), AppError> {
    let target = image_format(target_format).ok_or_else(|| {
        AppError::ImageConversion(format!("Unsupported format: {target_format}"))
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    if image::ImageFormat::from_mime_type(&image.mime_type) == Some(target) {
        tracing::debug!(path = %path.display(), "writing provider bytes as-is");
        return std::fs::write(path, &image.data).map_err(AppError::Io);
    }

    tracing::debug!(from = %image.mime_type, to = target_format, "re-encoding");
    let decoded = image::load_from_memory(&image.data)
        .map_err(|e| AppError::ImageConversion(format!("Failed to decode image: {e}")))?;
    let decoded = match target {
        image::ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(decoded.to_rgb8()),
        _ => decoded,
    };
    decoded
        .save_with_format(path, target)
        .map_err(|e| AppError::ImageConversion(format!("Failed to save as {target_format}: {e}")))
}

fn image_format(name: &str) -> Option<image::ImageFormat> {
    match name {
        "jpeg" => Some(image::ImageFormat::Jpeg),
        "png" => Some(image::ImageFormat::Png),
        "webp" => Some(image::ImageFormat::WebP),
        _ => None,
    }
}
