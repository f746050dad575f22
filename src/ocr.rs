use crate::engine::Recognizer;
use crate::error::OcrError;
use crate::settings::Configuration;
use std::path::Path;

/// Decodes images and hands them to the configured recognition backend
pub struct OcrProcessor {
    engine: Box<dyn Recognizer>,
}

impl OcrProcessor {
    pub fn new(engine: Box<dyn Recognizer>) -> Self {
        Self { engine }
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Transcribe the image at `path`, re-running recognition every time
    pub fn recognize(&self, path: &Path, config: &Configuration) -> Result<String, OcrError> {
        let image = image::open(path).map_err(|e| {
            tracing::debug!("Failed to load image {:?}: {}", path, e);
            OcrError::ImageUnreadable(path.to_path_buf())
        })?;

        let text = self.engine.recognize(&image, path, config)?;
        tracing::info!(
            "Recognized {} chars from {:?} using {}",
            text.len(),
            path,
            self.engine.name()
        );
        Ok(text)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::cell::Cell;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Backend returning canned text and counting invocations
    pub(crate) struct StubRecognizer {
        pub text: String,
        pub calls: std::rc::Rc<Cell<usize>>,
    }

    impl StubRecognizer {
        pub fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                calls: Default::default(),
            }
        }
    }

    impl Recognizer for StubRecognizer {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn recognize(
            &self,
            _image: &DynamicImage,
            _source: &Path,
            _config: &Configuration,
        ) -> Result<String, OcrError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.text.clone())
        }
    }

    #[test]
    fn test_nonexistent_image_is_unreadable() {
        let processor = OcrProcessor::new(Box::new(StubRecognizer::new("never")));
        let err = processor
            .recognize(Path::new("/no/such/image.jpg"), &Configuration::defaults())
            .unwrap_err();
        assert!(matches!(err, OcrError::ImageUnreadable(p) if p == PathBuf::from("/no/such/image.jpg")));
    }

    #[test]
    fn test_corrupt_image_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.jpg");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let processor = OcrProcessor::new(Box::new(StubRecognizer::new("never")));
        let err = processor
            .recognize(&path, &Configuration::defaults())
            .unwrap_err();
        assert!(matches!(err, OcrError::ImageUnreadable(_)));
    }

    #[test]
    fn test_every_call_reaches_the_engine() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ok.jpg");
        RgbImage::new(4, 4).save(&path).unwrap();

        let stub = StubRecognizer::new("text");
        let calls = stub.calls.clone();
        let processor = OcrProcessor::new(Box::new(stub));
        let config = Configuration::defaults();

        assert_eq!(processor.recognize(&path, &config).unwrap(), "text");
        assert_eq!(processor.recognize(&path, &config).unwrap(), "text");
        assert_eq!(calls.get(), 2);
        assert_eq!(processor.engine_name(), "stub");
    }
}
