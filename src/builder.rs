//! Request Builder: turns user inputs into a [`GenerationRequest`].
//!
//! Everything here is pure. Image bytes are loaded by the caller before a
//! request is built, and nothing touches the network.

use crate::error::GenerationError;
use crate::image_source::ImageSource;
use crate::params::AspectRatio;
use crate::ports::GenerationRequest;

/// Sentence appended when a reference image accompanies the request.
const REFERENCE_DIRECTIVE: &str =
    "Reference Design: Please use the provided reference image as a layout and style guide.";

/// Everything the user supplied for one generation round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationInputs {
    /// Product photos, in upload order.
    pub subjects: Vec<ImageSource>,
    /// Headline copy, embedded verbatim.
    pub main_text: String,
    /// Secondary copy, embedded verbatim.
    pub sub_text: String,
    /// Free-form style or atmosphere instruction, embedded verbatim.
    pub style: String,
    /// Requested output aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Optional layout/style guide image.
    pub reference: Option<ImageSource>,
    /// Change request; only set during a refinement round.
    pub modification: Option<String>,
}

impl GenerationInputs {
    /// Check that the inputs can produce a useful request.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Validation`] when no subject images are present.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.subjects.is_empty() {
            return Err(GenerationError::Validation(
                "No product images supplied. Provide at least one image.".into(),
            ));
        }
        Ok(())
    }
}

/// Pick the reference image: a user upload always wins over a template.
#[must_use]
pub fn select_reference(
    uploaded: Option<ImageSource>,
    template: Option<ImageSource>,
) -> Option<ImageSource> {
    uploaded.or(template)
}

/// Check a refinement instruction and return it trimmed.
///
/// # Errors
///
/// Returns [`GenerationError::Validation`] when the instruction is missing or blank.
pub fn validate_modification(instruction: Option<&str>) -> Result<&str, GenerationError> {
    match instruction.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(GenerationError::Validation(
            "No modification instruction supplied. Describe what to change.".into(),
        )),
    }
}

/// Build the request for one generation round.
///
/// # Errors
///
/// Returns [`GenerationError::Validation`] when no subject images are present.
pub fn build_request(inputs: &GenerationInputs) -> Result<GenerationRequest, GenerationError> {
    inputs.validate()?;

    Ok(GenerationRequest {
        instruction: compose_instruction(inputs),
        reference: inputs.reference.clone(),
        subjects: inputs.subjects.clone(),
        aspect_ratio: inputs.aspect_ratio,
    })
}

fn compose_instruction(inputs: &GenerationInputs) -> String {
    let mut text = format!(
        "Create a high-quality, premium gift selection image.\n\
         \n\
         Input Images: Use these product images as the main subjects.\n\
         \n\
         Text Content:\n\
         - Main Text: \"{main}\" (Make this prominent and elegant)\n\
         - Sub Text: \"{sub}\" (Smaller, complementary text)\n\
         \n\
         Style/Atmosphere: {style}\n\
         \n\
         Requirements:\n\
         - Professional product photography style.\n\
         - If multiple images are provided, arrange them tastefully.\n\
         - Add a \"Choice\" or \"Gift\" theme background.\n\
         - Make it look like a high-end e-commerce banner.\n\
         - Ensure text is legible and integrated into the design.",
        main = inputs.main_text,
        sub = inputs.sub_text,
        style = inputs.style,
    );

    if inputs.reference.is_some() {
        text.push_str("\n\n");
        text.push_str(REFERENCE_DIRECTIVE);
    }

    if let Some(change) = inputs.modification.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        text.push_str(&format!(
            "\n\nMODIFICATION REQUEST: {change}\n\
             Please regenerate the image applying these changes while keeping the original intent."
        ));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(byte: u8) -> ImageSource {
        ImageSource::new(vec![byte; 4], "image/jpeg")
    }

    fn inputs() -> GenerationInputs {
        GenerationInputs {
            subjects: vec![photo(1), photo(2)],
            main_text: "Pick Your Gift".into(),
            sub_text: "Recipients choose what they love".into(),
            style: "pastel, airy".into(),
            aspect_ratio: AspectRatio::Landscape,
            reference: None,
            modification: None,
        }
    }

    #[test]
    fn empty_subjects_fail_validation() {
        let inputs = GenerationInputs { subjects: Vec::new(), ..inputs() };
        assert!(matches!(build_request(&inputs), Err(GenerationError::Validation(_))));
    }

    #[test]
    fn instruction_embeds_text_verbatim() {
        let request = build_request(&inputs()).unwrap();
        assert!(request.instruction.contains("Main Text: \"Pick Your Gift\""));
        assert!(request.instruction.contains("Sub Text: \"Recipients choose what they love\""));
        assert!(request.instruction.contains("Style/Atmosphere: pastel, airy"));
        assert!(!request.instruction.contains("Reference Design"));
        assert!(!request.instruction.contains("MODIFICATION REQUEST"));
    }

    #[test]
    fn subjects_keep_upload_order_and_ratio() {
        let request = build_request(&inputs()).unwrap();
        assert_eq!(request.subjects, vec![photo(1), photo(2)]);
        assert_eq!(request.aspect_ratio, AspectRatio::Landscape);
        assert!(request.reference.is_none());
    }

    #[test]
    fn reference_adds_layout_directive() {
        let inputs = GenerationInputs { reference: Some(photo(9)), ..inputs() };
        let request = build_request(&inputs).unwrap();
        assert!(request.instruction.contains(REFERENCE_DIRECTIVE));
        assert_eq!(request.inline_images().next(), Some(&photo(9)));
    }

    #[test]
    fn modification_appends_directive() {
        let inputs =
            GenerationInputs { modification: Some("make background brighter".into()), ..inputs() };
        let request = build_request(&inputs).unwrap();
        assert!(request.instruction.contains("MODIFICATION REQUEST: make background brighter"));
        assert!(request.instruction.ends_with("keeping the original intent."));
    }

    #[test]
    fn blank_modification_is_ignored() {
        let inputs = GenerationInputs { modification: Some("   ".into()), ..inputs() };
        let request = build_request(&inputs).unwrap();
        assert!(!request.instruction.contains("MODIFICATION REQUEST"));
    }

    #[test]
    fn upload_wins_over_template() {
        assert_eq!(select_reference(Some(photo(1)), Some(photo(2))), Some(photo(1)));
        assert_eq!(select_reference(None, Some(photo(2))), Some(photo(2)));
        assert_eq!(select_reference(None, None), None);
    }

    #[test]
    fn modification_validation() {
        assert_eq!(validate_modification(Some("  bigger text ")).unwrap(), "bigger text");
        assert!(validate_modification(Some("")).is_err());
        assert!(validate_modification(Some(" \n")).is_err());
        assert!(validate_modification(None).is_err());
    }
}
