use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Settings file is corrupt: {0}")]
    ConfigCorrupt(String),

    #[error("Path does not exist: {}", .0.display())]
    PathInvalid(PathBuf),

    #[error("OCR binary not found: {}", .0.display())]
    BinaryNotFound(PathBuf),

    #[error("Unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("File {} moved or deleted, or is not a readable image", .0.display())]
    ImageUnreadable(PathBuf),

    #[error("Could not process file {}: {reason}", .path.display())]
    ImageDecodeFailed { path: PathBuf, reason: String },

    #[error("File {} already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("Invalid output directory: {}", .0.display())]
    InvalidOutputDirectory(PathBuf),

    #[error("Cannot read directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Nothing selected")]
    NothingSelected,

    #[error("Failed to build document: {0}")]
    Document(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OcrError {
    /// Stable identifier used in machine-readable reports
    pub fn code(&self) -> &'static str {
        match self {
            OcrError::ConfigCorrupt(_) => "CONFIG_CORRUPT",
            OcrError::PathInvalid(_) => "PATH_INVALID",
            OcrError::BinaryNotFound(_) => "BINARY_NOT_FOUND",
            OcrError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            OcrError::ImageUnreadable(_) => "IMAGE_UNREADABLE",
            OcrError::ImageDecodeFailed { .. } => "IMAGE_DECODE_FAILED",
            OcrError::DestinationExists(_) => "DESTINATION_EXISTS",
            OcrError::InvalidOutputDirectory(_) => "INVALID_OUTPUT_DIRECTORY",
            OcrError::DirectoryUnreadable { .. } => "DIRECTORY_UNREADABLE",
            OcrError::NothingSelected => "NOTHING_SELECTED",
            OcrError::Document(_) => "DOCUMENT_ERROR",
            OcrError::Io(_) => "IO_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&OcrError> for ErrorResponse {
    fn from(err: &OcrError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_carries_code_and_message() {
        let err = OcrError::BinaryNotFound(PathBuf::from("/nope/tesseract"));
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, "BINARY_NOT_FOUND");
        assert!(response.error.contains("/nope/tesseract"));
    }
}
