use crate::settings::{Configuration, SettingsStore};
use crate::Args;
use std::path::PathBuf;

/// Runtime configuration from the command line and environment
#[derive(Debug, Clone)]
pub struct Config {
    pub settings_path: PathBuf,
    pub binary: Option<PathBuf>,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub language: Option<String>,
}

impl Config {
    /// Persisted settings with any command-line overrides applied on top
    pub fn resolve(&self, persisted: Configuration) -> Configuration {
        Configuration {
            recognition_binary: self
                .binary
                .clone()
                .unwrap_or(persisted.recognition_binary),
            input_directory: self.input_dir.clone().unwrap_or(persisted.input_directory),
            output_directory: self
                .output_dir
                .clone()
                .unwrap_or(persisted.output_directory),
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            settings_path: args.settings.unwrap_or_else(SettingsStore::default_path),
            binary: args.binary,
            input_dir: args.input_dir,
            output_dir: args.output_dir,
            language: args.lang,
        }
    }
}
