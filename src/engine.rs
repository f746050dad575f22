use crate::error::OcrError;
use crate::settings::Configuration;
use image::DynamicImage;
use std::path::Path;

/// Trait that all recognition backends must implement
pub trait Recognizer {
    /// Returns the engine identifier (e.g., "tesseract")
    fn name(&self) -> &'static str;

    /// Transcribe an already decoded image.
    ///
    /// `source` is only used for error reporting. The configuration is passed
    /// on every call so a binary path changed mid-session takes effect.
    fn recognize(
        &self,
        image: &DynamicImage,
        source: &Path,
        config: &Configuration,
    ) -> Result<String, OcrError>;
}
