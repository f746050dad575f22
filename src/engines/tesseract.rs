//! Tesseract engine implementation
//!
//! Runs the Tesseract command-line binary on a temporary copy of the decoded
//! image and reads the transcription from its stdout.

use crate::engine::Recognizer;
use crate::error::OcrError;
use crate::settings::Configuration;
use image::{DynamicImage, ImageFormat};
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

/// Tesseract driven as a subprocess
#[derive(Debug, Clone, Default)]
pub struct TesseractEngine {
    /// Recognition language passed as `-l`; Tesseract's own default when unset
    language: Option<String>,
}

impl TesseractEngine {
    pub fn new(language: Option<String>) -> Self {
        Self { language }
    }
}

impl Recognizer for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        source: &Path,
        config: &Configuration,
    ) -> Result<String, OcrError> {
        let binary = &config.recognition_binary;

        // Tesseract only reads from disk, so hand it a PNG it is sure to understand
        let mut temp_file = tempfile::Builder::new().suffix(".png").tempfile()?;
        image
            .to_rgb8()
            .write_to(&mut temp_file, ImageFormat::Png)
            .map_err(|e| OcrError::ImageDecodeFailed {
                path: source.to_path_buf(),
                reason: format!("failed to re-encode image: {}", e),
            })?;

        let mut cmd = Command::new(binary);
        cmd.arg(temp_file.path()).arg("stdout");
        if let Some(lang) = &self.language {
            cmd.arg("-l").arg(lang);
        }

        tracing::debug!("Running {:?} on {:?}", binary, source);

        let output = cmd.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                OcrError::BinaryNotFound(binary.clone())
            }
            _ => OcrError::Io(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let first = stderr.lines().next().unwrap_or("").trim();
            let code = output.status.code().unwrap_or(-1);
            return Err(OcrError::ImageDecodeFailed {
                path: source.to_path_buf(),
                reason: format!("exit {}: {}", code, first),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(clean_output(&text))
    }
}

/// Strip the page separator and trailing whitespace Tesseract appends
fn clean_output(raw: &str) -> String {
    raw.trim_end_matches(|c: char| c == '\x0c' || c.is_whitespace())
        .to_string()
}
