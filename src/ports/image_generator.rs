//! Image generator port for the external generative-image API.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::image_source::ImageSource;
use crate::params::AspectRatio;

/// A fully assembled banner generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Natural-language instruction sent as the first part.
    pub instruction: String,
    /// Layout/style guide, sent ahead of the subject images.
    #[serde(default)]
    pub reference: Option<ImageSource>,
    /// Product photos, in upload order.
    pub subjects: Vec<ImageSource>,
    /// Requested output aspect ratio.
    pub aspect_ratio: AspectRatio,
}

impl GenerationRequest {
    /// Images in the order they are sent: reference first, then subjects.
    pub fn inline_images(&self) -> impl Iterator<Item = &ImageSource> {
        self.reference.iter().chain(self.subjects.iter())
    }
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ImageSource, GenerationError>> + Send + 'a>>;

/// Produces one banner image per request via an external API.
pub trait ImageGenerator: Send + Sync {
    /// Generate an image for the given request.
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_>;
}
