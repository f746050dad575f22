//! Folder scanning
//!
//! Lists a directory and keeps only the files that look like supported
//! images and actually decode.

use crate::error::OcrError;
use image::ImageReader;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions admitted into the pipeline (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "gif", "jpeg", "jfif"];

/// A validated image found by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub name: String,
    pub directory: PathBuf,
}

impl ImageCandidate {
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }
}

/// Names of the valid images in `directory`, re-read on every call
pub fn scan(directory: &Path) -> Result<Vec<String>, OcrError> {
    let entries = fs::read_dir(directory).map_err(|e| OcrError::DirectoryUnreadable {
        path: directory.to_path_buf(),
        source: e,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {:?}: {}", directory, e);
                continue;
            }
        };

        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if !has_supported_extension(&name) {
            continue;
        }

        if decodes(&entry.path()) {
            names.push(name);
        } else {
            tracing::debug!("Discarding {:?}: not a decodable image", entry.path());
        }
    }

    names.sort();
    tracing::info!("Found {} valid images in {:?}", names.len(), directory);
    Ok(names)
}

/// Same as [`scan`], paired with the directory they were found in
pub fn candidates(directory: &Path) -> Result<Vec<ImageCandidate>, OcrError> {
    Ok(scan(directory)?
        .into_iter()
        .map(|name| ImageCandidate {
            name,
            directory: directory.to_path_buf(),
        })
        .collect())
}

pub fn has_supported_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Reject paths that a scan would never have listed because of their extension.
///
/// Decoding is left to recognition, which reports `ImageUnreadable`.
pub fn ensure_supported(path: &Path) -> Result<(), OcrError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if has_supported_extension(&name) {
        Ok(())
    } else {
        Err(OcrError::UnsupportedFormat(path.to_path_buf()))
    }
}

fn decodes(path: &Path) -> bool {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(image::ImageError::from)
        .and_then(|reader| reader.decode())
        .is_ok()
}
