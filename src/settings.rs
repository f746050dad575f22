//! Persisted user settings
//!
//! The settings file is three plain lines: OCR binary path, last input
//! directory, last output directory. Anything that cannot be trusted falls
//! back to defaults without bothering the user.

use crate::error::OcrError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.ini";

#[cfg(windows)]
const DEFAULT_BINARY: &str = "C:/Program Files/Tesseract-OCR/tesseract.exe";
#[cfg(not(windows))]
const DEFAULT_BINARY: &str = "/usr/bin/tesseract";

/// Process-wide configuration shared by the scanner, recognizer and exporter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub recognition_binary: PathBuf,
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
}

impl Configuration {
    /// Built-in defaults: platform Tesseract location and the working directory
    pub fn defaults() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            recognition_binary: PathBuf::from(DEFAULT_BINARY),
            input_directory: cwd.clone(),
            output_directory: cwd,
        }
    }

    fn to_file_contents(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.recognition_binary.display(),
            self.input_directory.display(),
            self.output_directory.display()
        )
    }
}

/// Reads and writes the three-line settings file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    defaults: Configuration,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>, defaults: Configuration) -> Self {
        Self {
            path: path.into(),
            defaults,
        }
    }

    /// Settings file under the user config directory, or `./settings.ini`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("folder-ocr").join(SETTINGS_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub fn defaults(&self) -> &Configuration {
        &self.defaults
    }

    /// Load settings, healing a missing or corrupt file along the way
    pub fn load(&self) -> Configuration {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No settings file at {:?}, creating one", self.path);
                self.write_defaults();
                return self.defaults.clone();
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return self.discard(OcrError::ConfigCorrupt(e.to_string()));
            }
            Err(e) => {
                tracing::warn!("Failed to read settings file {:?}: {}", self.path, e);
                return self.defaults.clone();
            }
        };

        match parse_lines(&contents) {
            Ok([binary, input, output]) => Configuration {
                recognition_binary: self.accept(binary, &self.defaults.recognition_binary),
                input_directory: self.accept(input, &self.defaults.input_directory),
                output_directory: self.accept(output, &self.defaults.output_directory),
            },
            Err(e) => self.discard(e),
        }
    }

    /// Replace a corrupt settings file with defaults
    fn discard(&self, reason: OcrError) -> Configuration {
        tracing::warn!("{}; discarding {:?}", reason, self.path);
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove corrupt settings file: {}", e);
        }
        self.write_defaults();
        self.defaults.clone()
    }

    /// Overwrite the settings file; paths are not validated here
    pub fn save(&self, config: &Configuration) -> Result<(), OcrError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, config.to_file_contents())?;
        tracing::debug!("Saved settings to {:?}", self.path);
        Ok(())
    }

    fn write_defaults(&self) {
        if let Err(e) = self.save(&self.defaults) {
            tracing::warn!("Failed to write default settings: {}", e);
        }
    }

    fn accept(&self, value: &str, fallback: &Path) -> PathBuf {
        match validate_path(value) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("{}; using {:?}", e, fallback);
                fallback.to_path_buf()
            }
        }
    }
}

fn parse_lines(contents: &str) -> Result<[&str; 3], OcrError> {
    let mut lines = contents.lines().map(str::trim);
    match (lines.next(), lines.next(), lines.next()) {
        (Some(binary), Some(input), Some(output)) => Ok([binary, input, output]),
        _ => Err(OcrError::ConfigCorrupt(format!(
            "expected 3 lines, found {}",
            contents.lines().count()
        ))),
    }
}

fn validate_path(value: &str) -> Result<PathBuf, OcrError> {
    let path = PathBuf::from(value);
    if !value.is_empty() && path.exists() {
        Ok(path)
    } else {
        Err(OcrError::PathInvalid(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        store: SettingsStore,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let defaults = Configuration {
            recognition_binary: PathBuf::from("/default/tesseract"),
            input_directory: PathBuf::from("/default/in"),
            output_directory: PathBuf::from("/default/out"),
        };
        let store = SettingsStore::new(dir.path().join("settings.ini"), defaults);
        Fixture { dir, store }
    }

    fn existing_file(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let f = fixture();
        let config = f.store.load();
        assert_eq!(&config, f.store.defaults());
        let written = fs::read_to_string(f.store.path()).unwrap();
        assert_eq!(written, "/default/tesseract\n/default/in\n/default/out");
    }

    #[test]
    fn test_short_file_falls_back_to_defaults_and_is_replaced() {
        let f = fixture();
        let real = f.dir.path().to_string_lossy().to_string();
        fs::write(f.store.path(), format!("{}\n{}\n", real, real)).unwrap();

        let config = f.store.load();
        assert_eq!(&config, f.store.defaults());

        // The corrupt content is gone; a fresh defaults file took its place
        let written = fs::read_to_string(f.store.path()).unwrap();
        assert!(!written.contains(&real));
        assert_eq!(written.lines().count(), 3);
    }

    #[test]
    fn test_empty_file_is_corrupt() {
        let f = fixture();
        fs::write(f.store.path(), "").unwrap();
        assert_eq!(&f.store.load(), f.store.defaults());
    }

    #[test]
    fn test_non_utf8_file_is_replaced_with_defaults() {
        let f = fixture();
        fs::write(f.store.path(), b"\xff\xfe\n").unwrap();

        assert_eq!(&f.store.load(), f.store.defaults());
        let written = fs::read(f.store.path()).unwrap();
        assert_eq!(written, b"/default/tesseract\n/default/in\n/default/out");
    }

    #[test]
    fn test_nonexistent_input_dir_falls_back_individually() {
        let f = fixture();
        let binary = existing_file(&f.dir, "tesseract");
        let output = f.dir.path().join("out");
        fs::create_dir(&output).unwrap();
        fs::write(
            f.store.path(),
            format!(
                "{}\n/definitely/not/here\n{}",
                binary.display(),
                output.display()
            ),
        )
        .unwrap();

        let config = f.store.load();
        assert_eq!(config.recognition_binary, binary);
        assert_eq!(config.input_directory, PathBuf::from("/default/in"));
        assert_eq!(config.output_directory, output);
    }

    #[test]
    fn test_blank_line_is_not_accepted() {
        let f = fixture();
        let real = f.dir.path().display().to_string();
        fs::write(f.store.path(), format!("\n{}\n{}", real, real)).unwrap();

        let config = f.store.load();
        assert_eq!(config.recognition_binary, PathBuf::from("/default/tesseract"));
        assert_eq!(config.input_directory, f.dir.path());
    }

    #[test]
    fn test_extra_lines_are_ignored() {
        let f = fixture();
        let real = f.dir.path().display().to_string();
        fs::write(
            f.store.path(),
            format!("{r}\n{r}\n{r}\nsomething else\n", r = real),
        )
        .unwrap();

        let config = f.store.load();
        assert_eq!(config.output_directory, f.dir.path());
    }

    #[test]
    fn test_save_then_load_round_trips_existing_paths() {
        let f = fixture();
        let binary = existing_file(&f.dir, "tesseract");
        let config = Configuration {
            recognition_binary: binary.clone(),
            input_directory: f.dir.path().to_path_buf(),
            output_directory: f.dir.path().join("missing"),
        };

        f.store.save(&config).unwrap();
        let loaded = f.store.load();

        assert_eq!(loaded.recognition_binary, binary);
        assert_eq!(loaded.input_directory, f.dir.path());
        assert_eq!(loaded.output_directory, PathBuf::from("/default/out"));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(
            dir.path().join("nested").join("settings.ini"),
            Configuration::defaults(),
        );
        store.save(store.defaults()).unwrap();
        assert!(store.path().is_file());
    }
}
