//! Caller-held session state and the refinement loop.
//!
//! A [`Session`] owns the last successful image and the inputs that produced
//! it. Every transition is started by the caller; nothing retries on its own.

use crate::builder::{build_request, validate_modification, GenerationInputs};
use crate::error::GenerationError;
use crate::image_source::ImageSource;
use crate::ports::ImageGenerator;

/// Where the session stands in the generate/refine cycle.
///
/// Inputs rejected by validation never reach the generator, so they leave
/// the state and the retained image exactly as they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing attempted yet.
    Idle,
    /// A request is in flight.
    Generating,
    /// The last attempt produced an image.
    Success,
    /// The last attempt failed; any earlier image is still retained.
    Failed,
}

/// State for one interactive run.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    base_inputs: Option<GenerationInputs>,
    artifact: Option<ImageSource>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session with no image.
    #[must_use]
    pub fn new() -> Self {
        Self { state: SessionState::Idle, base_inputs: None, artifact: None }
    }

    /// Continue from an image produced earlier, e.g. one loaded from disk.
    #[must_use]
    pub fn resume(inputs: GenerationInputs, artifact: ImageSource) -> Self {
        Self {
            state: SessionState::Success,
            base_inputs: Some(strip_round_specific(inputs)),
            artifact: Some(artifact),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The most recent successful image, if any.
    #[must_use]
    pub fn artifact(&self) -> Option<&ImageSource> {
        self.artifact.as_ref()
    }

    /// Run a fresh generation round.
    ///
    /// On success the retained image is replaced and `inputs` become the base
    /// for later refinements. On failure the previous image is kept.
    ///
    /// # Errors
    ///
    /// Returns the classified [`GenerationError`] of the attempt.
    pub async fn generate(
        &mut self,
        generator: &dyn ImageGenerator,
        inputs: GenerationInputs,
    ) -> Result<&ImageSource, GenerationError> {
        self.run(generator, inputs.clone(), strip_round_specific(inputs)).await
    }

    /// Run a refinement round against the retained image.
    ///
    /// The request reuses the base inputs, swaps the reference slot for the
    /// retained image, and carries `instruction` as the modification.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Validation`] if there is nothing to refine or
    /// the instruction is blank; otherwise the classified error of the attempt.
    pub async fn refine(
        &mut self,
        generator: &dyn ImageGenerator,
        instruction: &str,
    ) -> Result<&ImageSource, GenerationError> {
        let instruction = validate_modification(Some(instruction))?;
        let (Some(base), Some(previous)) = (&self.base_inputs, &self.artifact) else {
            return Err(GenerationError::Validation(
                "Nothing to refine yet. Generate an image first.".into(),
            ));
        };

        let round = GenerationInputs {
            reference: Some(previous.clone()),
            modification: Some(instruction.to_string()),
            ..base.clone()
        };
        let base = base.clone();
        self.run(generator, round, base).await
    }

    async fn run(
        &mut self,
        generator: &dyn ImageGenerator,
        round: GenerationInputs,
        base: GenerationInputs,
    ) -> Result<&ImageSource, GenerationError> {
        let request = build_request(&round)?;

        self.state = SessionState::Generating;
        tracing::debug!(
            refinement = round.modification.is_some(),
            images = request.inline_images().count(),
            "generation started"
        );

        match generator.generate(&request).await {
            Ok(image) => {
                tracing::debug!(bytes = image.data.len(), "generation succeeded");
                self.state = SessionState::Success;
                self.base_inputs = Some(base);
                Ok(self.artifact.insert(image))
            }
            Err(e) => {
                tracing::debug!(error = %e, "generation failed");
                self.state = SessionState::Failed;
                Err(e)
            }
        }
    }
}

/// Drop the per-round modification so refinements don't stack.
fn strip_round_specific(inputs: GenerationInputs) -> GenerationInputs {
    GenerationInputs { modification: None, ..inputs }
}
