//! Sequential OCR-and-export over a selection of images
//!
//! Each image is recognised and written before the next one starts. A
//! failure is recorded against its image and the loop moves on.

use crate::error::{ErrorResponse, OcrError};
use crate::export::{self, ExportFormat, ExportTarget};
use crate::ocr::OcrProcessor;
use crate::scanner;
use crate::settings::Configuration;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What happened to one image in a batch
#[derive(Debug)]
pub enum ItemOutcome {
    Written(PathBuf),
    /// Recognition produced no text, nothing was written
    Empty,
    Failed(OcrError),
}

#[derive(Debug)]
pub struct ItemReport {
    pub image: PathBuf,
    pub outcome: ItemOutcome,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Written(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }
}

/// Serializable view of a single item, for `--json` output
#[derive(Debug, Serialize)]
pub struct ItemSummary {
    pub image: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl From<&ItemReport> for ItemSummary {
    fn from(item: &ItemReport) -> Self {
        let image = item.image.display().to_string();
        match &item.outcome {
            ItemOutcome::Written(path) => Self {
                image,
                status: "written",
                output: Some(path.display().to_string()),
                error: None,
            },
            ItemOutcome::Empty => Self {
                image,
                status: "empty",
                output: None,
                error: None,
            },
            ItemOutcome::Failed(e) => Self {
                image,
                status: "failed",
                output: None,
                error: Some(ErrorResponse::from(e)),
            },
        }
    }
}

/// Runs recognition and export for a list of images
pub struct BatchRunner<'a> {
    processor: &'a OcrProcessor,
    format: ExportFormat,
}

impl<'a> BatchRunner<'a> {
    pub fn new(processor: &'a OcrProcessor, format: ExportFormat) -> Self {
        Self { processor, format }
    }

    /// Process `images` in order.
    ///
    /// `confirm_overwrite` is asked before replacing an existing output file;
    /// declining records `DestinationExists` for that image.
    pub fn run<F>(
        &self,
        images: &[PathBuf],
        config: &Configuration,
        mut confirm_overwrite: F,
    ) -> Result<BatchReport, OcrError>
    where
        F: FnMut(&Path) -> bool,
    {
        if images.is_empty() {
            return Err(OcrError::NothingSelected);
        }

        let mut report = BatchReport::default();
        for image in images {
            let outcome = self.process_one(image, config, &mut confirm_overwrite);
            match &outcome {
                ItemOutcome::Written(_) => {}
                ItemOutcome::Empty => tracing::warn!("No text recognized in {:?}", image),
                ItemOutcome::Failed(e) => tracing::error!("{}", e),
            }
            report.items.push(ItemReport {
                image: image.clone(),
                outcome,
            });
        }

        tracing::info!(
            "Batch finished: {} written, {} failed, {} total",
            report.written(),
            report.failed(),
            report.items.len()
        );
        Ok(report)
    }

    fn process_one<F>(&self, image: &Path, config: &Configuration, confirm: &mut F) -> ItemOutcome
    where
        F: FnMut(&Path) -> bool,
    {
        if let Err(e) = scanner::ensure_supported(image) {
            return ItemOutcome::Failed(e);
        }

        let text = match self.processor.recognize(image, config) {
            Ok(text) => text,
            Err(e) => return ItemOutcome::Failed(e),
        };
        if text.trim().is_empty() {
            return ItemOutcome::Empty;
        }

        let target = ExportTarget::for_image(&config.output_directory, image, self.format);
        if target.exists() && !confirm(&target.path()) {
            return ItemOutcome::Failed(OcrError::DestinationExists(target.path()));
        }

        match export::write(&text, &target) {
            Ok(path) => ItemOutcome::Written(path),
            Err(e) => ItemOutcome::Failed(e),
        }
    }
}
