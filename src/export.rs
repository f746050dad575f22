//! Writing transcriptions to disk
//!
//! Plain text is written verbatim. Documents get one paragraph per
//! blank-line separated block of text.

use crate::error::OcrError;
use docx_rs::{BreakType, Docx, Paragraph, Run};
use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    PlainText,
    Document,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Document => "docx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" | "text" => Ok(Self::PlainText),
            "docx" | "document" => Ok(Self::Document),
            other => Err(format!("unknown format '{}', expected txt or docx", other)),
        }
    }
}

/// Where a transcription ends up: `{output_directory}/{base_name}.{ext}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub output_directory: PathBuf,
    pub base_name: String,
    pub format: ExportFormat,
}

impl ExportTarget {
    pub fn new(output_directory: impl Into<PathBuf>, base_name: &str, format: ExportFormat) -> Self {
        Self {
            output_directory: output_directory.into(),
            base_name: base_name.to_string(),
            format,
        }
    }

    /// Target named after the image's file stem
    pub fn for_image(output_directory: &Path, image: &Path, format: ExportFormat) -> Self {
        let base_name = image
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::new(output_directory, &base_name, format)
    }

    pub fn path(&self) -> PathBuf {
        self.output_directory
            .join(format!("{}.{}", self.base_name, self.format.extension()))
    }

    pub fn exists(&self) -> bool {
        self.path().is_file()
    }
}

/// Write `text` to the target, replacing any existing file.
///
/// Overwrite confirmation is the caller's job.
pub fn write(text: &str, target: &ExportTarget) -> Result<PathBuf, OcrError> {
    if !target.output_directory.is_dir() {
        return Err(OcrError::InvalidOutputDirectory(
            target.output_directory.clone(),
        ));
    }

    let path = target.path();
    match target.format {
        ExportFormat::PlainText => {
            fs::write(&path, text).map_err(|e| output_error(e, target))?;
        }
        ExportFormat::Document => {
            // Packed in memory; a failed build leaves nothing on disk
            let mut buffer = Cursor::new(Vec::new());
            build_document(text)
                .build()
                .pack(&mut buffer)
                .map_err(|e| OcrError::Document(e.to_string()))?;
            fs::write(&path, buffer.into_inner()).map_err(|e| output_error(e, target))?;
        }
    }

    tracing::info!("Wrote {:?}", path);
    Ok(path)
}

/// One paragraph per `\n\n`-separated segment; single newlines become breaks
fn build_document(text: &str) -> Docx {
    text.split("\n\n").fold(Docx::new(), |doc, segment| {
        let mut run = Run::new();
        for (i, line) in segment.split('\n').enumerate() {
            if i > 0 {
                run = run.add_break(BreakType::TextWrapping);
            }
            run = run.add_text(line);
        }
        doc.add_paragraph(Paragraph::new().add_run(run))
    })
}

fn output_error(e: std::io::Error, target: &ExportTarget) -> OcrError {
    match e.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => {
            OcrError::InvalidOutputDirectory(target.output_directory.clone())
        }
        _ => OcrError::Io(e),
    }
}
