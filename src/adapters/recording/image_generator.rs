//! Recording adapter for the `ImageGenerator` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::image_source::ImageSource;
use crate::ports::image_generator::{GenerateFuture, GenerationRequest, ImageGenerator};

/// Records generation interactions while delegating to an inner implementation.
pub struct RecordingImageGenerator {
    inner: Box<dyn ImageGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageGenerator {
    /// Creates a new recording generator wrapping the given implementation.
    pub fn new(inner: Box<dyn ImageGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageGenerator for RecordingImageGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.generate(&request).await;
            let summary = RequestSummary::from(&request);
            record_result(&recorder, "image_generator", "generate", &summary, &result);
            result
        })
    }
}

/// What a cassette keeps of a request: uploads are summarized, not embedded.
#[derive(Debug, Serialize)]
struct RequestSummary {
    instruction: String,
    aspect_ratio: &'static str,
    reference: Option<ImageSummary>,
    subjects: Vec<ImageSummary>,
}

#[derive(Debug, Serialize)]
struct ImageSummary {
    mime_type: String,
    bytes: usize,
}

impl From<&GenerationRequest> for RequestSummary {
    fn from(request: &GenerationRequest) -> Self {
        let summarize = |image: &ImageSource| ImageSummary {
            mime_type: image.mime_type.clone(),
            bytes: image.data.len(),
        };
        Self {
            instruction: request.instruction.clone(),
            aspect_ratio: request.aspect_ratio.as_str(),
            reference: request.reference.as_ref().map(summarize),
            subjects: request.subjects.iter().map(summarize).collect(),
        }
    }
}
