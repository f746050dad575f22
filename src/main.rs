use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod batch;
mod commands;
mod config;
mod engine;
mod engines;
mod error;
mod export;
mod ocr;
mod scanner;
mod settings;

use export::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "folder-ocr")]
#[command(about = "OCR a folder of images and export the text as txt or docx")]
#[command(version)]
pub struct Args {
    /// Settings file (default: folder-ocr/settings.ini in the user config dir)
    #[arg(long, global = true, env = "FOLDER_OCR_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Tesseract binary to run instead of the saved one
    #[arg(long, global = true, env = "FOLDER_OCR_BINARY")]
    pub binary: Option<PathBuf>,

    /// Folder to read images from instead of the saved one
    #[arg(long, global = true, env = "FOLDER_OCR_INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Folder to write transcriptions to instead of the saved one
    #[arg(long, global = true, env = "FOLDER_OCR_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Recognition language (e.g., "eng", "deu", "eng+fra")
    #[arg(long, global = true, env = "FOLDER_OCR_LANG")]
    pub lang: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the valid images in a folder
    Scan {
        /// Folder to scan (default: the input folder)
        dir: Option<PathBuf>,

        /// Print a JSON array instead of one name per line
        #[arg(long)]
        json: bool,
    },

    /// Recognize a single image and print its text
    Preview {
        /// Image path, relative to the input folder unless absolute
        image: PathBuf,
    },

    /// Recognize images and save the text to the output folder
    Export {
        /// Images to process, relative to the input folder unless absolute
        images: Vec<PathBuf>,

        /// Process every valid image in the input folder
        #[arg(long, conflicts_with = "images")]
        all: bool,

        /// Output format: txt or docx
        #[arg(long, default_value = "txt")]
        format: ExportFormat,

        /// Overwrite existing files without asking
        #[arg(short, long)]
        yes: bool,

        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or persist the settings file
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Print the effective settings
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Save the effective settings, including any overrides given
    Save,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Initialize tracing; stdout is reserved for results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = args.command.clone();
    let config = config::Config::from(args);

    tracing::debug!(
        "Starting folder-ocr v{} with settings {:?}",
        env!("CARGO_PKG_VERSION"),
        config.settings_path
    );

    commands::run(config, command)
}
