//! In-memory image value shared by uploads, templates, and generated output.

use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// MIME types accepted for uploaded images.
const ACCEPTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// Raw image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    /// Raw image bytes.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// MIME type (e.g., `"image/png"`).
    pub mime_type: String,
}

impl ImageSource {
    /// Wrap bytes that are already in memory.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self { data, mime_type: mime_type.into() }
    }

    /// Read an image from disk.
    ///
    /// The MIME type comes from the file extension, or from the content when
    /// the extension is missing or unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not PNG, JPEG or WebP.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let data = std::fs::read(path).map_err(|e| {
            AppError::InvalidArgument(format!("Cannot read image {}: {e}", path.display()))
        })?;

        let format = image::ImageFormat::from_path(path)
            .ok()
            .or_else(|| image::guess_format(&data).ok())
            .ok_or_else(|| {
                AppError::InvalidArgument(format!(
                    "Cannot determine image type of {}",
                    path.display()
                ))
            })?;

        let mime_type = format.to_mime_type();
        if !ACCEPTED_MIME_TYPES.contains(&mime_type) {
            return Err(AppError::InvalidArgument(format!(
                "Unsupported image type {mime_type} for {}. Use PNG, JPEG or WebP.",
                path.display()
            )));
        }

        Ok(Self::new(data, mime_type))
    }

    /// Standard base64 encoding of the image bytes.
    #[must_use]
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
