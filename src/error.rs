//! Error types for banner generation and the command-line front end.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classified failure of a single generation attempt.
///
/// Every fault raised while building, sending, or decoding a request ends up
/// as one of these variants; nothing escapes the transport boundary as a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GenerationError {
    /// Inputs were rejected before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider answered HTTP 429.
    #[error("API error: 429 (quota exceeded). Try a different model ID with --model.")]
    QuotaExceeded,

    /// The provider answered with any other non-2xx status.
    #[error("API error: {status}\n{body}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// HTTP success, but the body did not carry a decodable image.
    #[error("Unexpected response: {0}")]
    ResponseShape(String),

    /// Connection failure, timeout, or a request that could not be built.
    #[error("Network error: {0}")]
    Transport(String),
}

/// The request URL is dropped from the message since it carries the API key.
impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Transport(message)
    }
}

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum AppError {
    /// A generation attempt failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// No API key configured.
    #[error("No API key for Gemini. Set GOOGLE_API_KEY or add it to the config file.")]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_message_suggests_model_change() {
        let msg = GenerationError::QuotaExceeded.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("--model"));
    }

    #[test]
    fn provider_message_carries_status_and_body() {
        let err = GenerationError::Provider { status: 503, body: "overloaded".into() };
        assert_eq!(err.to_string(), "API error: 503\noverloaded");
    }

    #[test]
    fn generation_error_survives_json() {
        let err = GenerationError::Provider { status: 400, body: "bad".into() };
        let json = serde_json::to_string(&err).unwrap();
        let back: GenerationError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn app_error_is_transparent_over_generation() {
        let err: AppError = GenerationError::Validation("no images".into()).into();
        assert_eq!(err.to_string(), "Validation error: no images");
    }
}
