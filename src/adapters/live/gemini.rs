//! Live adapter for the Gemini `generateContent` image API.

use std::time::Duration;

use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::image_source::ImageSource;
use crate::ports::image_generator::{GenerateFuture, GenerationRequest, ImageGenerator};

/// Default endpoint prefix; the model and method are appended per request.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Connection parameters supplied by configuration.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Endpoint prefix, e.g. [`GEMINI_API_BASE`].
    pub base_url: String,
    /// API credential, sent as the `key` query parameter.
    pub api_key: String,
    /// Resolved model identifier.
    pub model: String,
    /// Ceiling for the whole request, including the response body.
    pub timeout: Duration,
}

/// Live Gemini image generator that calls the Google AI API.
pub struct GeminiGenerator {
    client: Client,
    settings: GeminiSettings,
}

impl GeminiGenerator {
    /// Create a generator with a bounded network timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Transport`] if the HTTP client cannot be built.
    pub fn new(settings: GeminiSettings) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> String {
        let base = self.settings.base_url.trim_end_matches('/');
        format!("{base}/{}:generateContent", self.settings.model)
    }
}

impl ImageGenerator for GeminiGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let body = GeminiRequest::from_generation_request(request);
        Box::pin(async move {
            let url = self.endpoint();
            tracing::debug!(
                %url,
                parts = body.contents[0].parts.len(),
                aspect_ratio = %body.generation_config.image_config.aspect_ratio,
                "sending generation request"
            );

            let response = self
                .client
                .post(&url)
                .query(&[("key", self.settings.api_key.as_str())])
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;
            tracing::debug!(
                status = status.as_u16(),
                bytes = response_text.len(),
                "response received"
            );

            if !status.is_success() {
                return Err(classify_status(status.as_u16(), response_text));
            }

            let image = decode_response(&response_text)?;
            tracing::debug!(
                mime_type = %image.mime_type,
                bytes = image.data.len(),
                "image decoded"
            );
            Ok(image)
        })
    }
}

/// Map a non-success HTTP status to its error kind.
fn classify_status(status: u16, body: String) -> GenerationError {
    if status == 429 {
        GenerationError::QuotaExceeded
    } else {
        GenerationError::Provider { status, body }
    }
}

/// Extract the first inline image from a successful response body.
fn decode_response(body: &str) -> Result<ImageSource, GenerationError> {
    let parsed: GeminiResponse = serde_json::from_str(body).map_err(|e| {
        GenerationError::ResponseShape(format!("Failed to parse response: {e}"))
    })?;

    let candidate = parsed.candidates.into_iter().next().ok_or_else(|| {
        GenerationError::ResponseShape("No generation candidates in response.".into())
    })?;

    let inline = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .find_map(|p| p.inline_data)
        .ok_or_else(|| {
            GenerationError::ResponseShape(format!(
                "No image was generated; the response carries no image data. Body: {}",
                truncate(body, 500)
            ))
        })?;

    let data = base64::engine::general_purpose::STANDARD
        .decode(inline.data.trim())
        .map_err(|e| GenerationError::ResponseShape(format!("Failed to decode base64: {e}")))?;
    if data.is_empty() {
        return Err(GenerationError::ResponseShape("Image data is empty.".into()));
    }
    let format = image::guess_format(&data).map_err(|e| {
        GenerationError::ResponseShape(format!("Image data is not a recognized image: {e}"))
    })?;

    let mime_type = inline.mime_type.unwrap_or_else(|| format.to_mime_type().to_string());
    Ok(ImageSource::new(data, mime_type))
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

// --- Gemini API request types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text { text: String },
    InlineData { inline_data: RequestInlineData },
}

#[derive(Debug, Serialize)]
struct RequestInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
}

impl GeminiRequest {
    fn from_generation_request(request: &GenerationRequest) -> Self {
        let mut parts = vec![RequestPart::Text { text: request.instruction.clone() }];
        parts.extend(request.inline_images().map(|image| RequestPart::InlineData {
            inline_data: RequestInlineData {
                mime_type: image.mime_type.clone(),
                data: image.to_base64(),
            },
        }));

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE"],
                image_config: ImageConfig { aspect_ratio: request.aspect_ratio.as_str() },
            },
        }
    }
}

// --- Gemini API response types ---

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, alias = "inline_data")]
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    #[serde(default, alias = "mime_type")]
    mime_type: Option<String>,
    data: String,
}
