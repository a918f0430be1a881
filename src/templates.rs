//! Built-in reference templates addressable by name.

use std::path::{Path, PathBuf};

use crate::builder::select_reference;
use crate::config::{TemplateEntry, TemplatesConfig};
use crate::error::AppError;
use crate::image_source::ImageSource;

/// Named layout templates resolved against a directory.
#[derive(Debug)]
pub struct TemplateCatalog {
    dir: PathBuf,
    entries: Vec<TemplateEntry>,
}

impl TemplateCatalog {
    /// Build the catalog from configuration.
    #[must_use]
    pub fn from_config(config: &TemplatesConfig) -> Self {
        Self { dir: config.dir.clone(), entries: config.entries.clone() }
    }

    /// Template names with their resolved file paths, in catalog order.
    pub fn list(&self) -> impl Iterator<Item = (&str, PathBuf)> {
        self.entries.iter().map(|e| (e.name.as_str(), self.dir.join(&e.file)))
    }

    /// Resolve a template name to its file path.
    ///
    /// # Errors
    ///
    /// Returns an error if no template has that name.
    pub fn path_of(&self, name: &str) -> Result<PathBuf, AppError> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
            .map(|e| self.dir.join(&e.file))
            .ok_or_else(|| {
                let names: Vec<&str> = self.entries.iter().map(|e| e.name.as_str()).collect();
                AppError::InvalidArgument(format!(
                    "Unknown template '{name}'. Available: {}",
                    names.join(", ")
                ))
            })
    }

    /// Load the image behind a template name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown or the file cannot be read.
    pub fn load(&self, name: &str) -> Result<ImageSource, AppError> {
        ImageSource::from_path(&self.path_of(name)?)
    }
}

/// Load the reference image for a round.
///
/// A user upload takes priority; the template is only read when no upload was
/// given, but its name is checked either way.
///
/// # Errors
///
/// Returns an error if the upload cannot be read or the template is unknown
/// or unreadable.
pub fn resolve_reference(
    upload: Option<&Path>,
    template: Option<&str>,
    catalog: &TemplateCatalog,
) -> Result<Option<ImageSource>, AppError> {
    if let Some(name) = template {
        catalog.path_of(name)?;
    }
    let uploaded = upload.map(ImageSource::from_path).transpose()?;
    let template = match (&uploaded, template) {
        (None, Some(name)) => Some(catalog.load(name)?),
        _ => None,
    };
    Ok(select_reference(uploaded, template))
}
