use crate::batch::{BatchRunner, ItemOutcome, ItemSummary};
use crate::config::Config;
use crate::engines::TesseractEngine;
use crate::error::OcrError;
use crate::ocr::OcrProcessor;
use crate::scanner;
use crate::settings::{Configuration, SettingsStore};
use crate::{Command, SettingsAction};
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Dispatch a subcommand against the loaded settings
pub fn run(config: Config, command: Command) -> anyhow::Result<ExitCode> {
    let store = SettingsStore::new(&config.settings_path, Configuration::defaults());
    let current = config.resolve(store.load());
    let processor = OcrProcessor::new(Box::new(TesseractEngine::new(config.language.clone())));
    tracing::debug!(
        "Using {} at {:?}",
        processor.engine_name(),
        current.recognition_binary
    );

    match command {
        Command::Scan { dir, json } => {
            let dir = dir.unwrap_or_else(|| current.input_directory.clone());
            let names = scanner::scan(&dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Preview { image } => {
            let path = resolve_image(&current, &image);
            scanner::ensure_supported(&path)?;
            let text = processor.recognize(&path, &current)?;
            if text.trim().is_empty() {
                eprintln!("{}: no text recognized", path.display());
            } else {
                println!("{}", text);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Export {
            images,
            all,
            format,
            yes,
            json,
        } => {
            let selected: Vec<PathBuf> = if all {
                scanner::candidates(&current.input_directory)?
                    .iter()
                    .map(|c| c.path())
                    .collect()
            } else {
                images
                    .iter()
                    .map(|image| resolve_image(&current, image))
                    .collect()
            };

            let report = BatchRunner::new(&processor, format).run(&selected, &current, |path| {
                confirm_overwrite(path, yes)
            })?;

            if let Err(e) = store.save(&current) {
                tracing::warn!("Failed to save settings: {}", e);
            }

            if json {
                let summaries: Vec<ItemSummary> =
                    report.items.iter().map(ItemSummary::from).collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for item in &report.items {
                    match &item.outcome {
                        ItemOutcome::Written(path) => {
                            println!("{} -> {}", item.image.display(), path.display())
                        }
                        ItemOutcome::Empty => {
                            println!("{}: no text recognized", item.image.display())
                        }
                        ItemOutcome::Failed(e) => {
                            eprintln!("{}: {}", item.image.display(), e)
                        }
                    }
                }
            }

            Ok(if report.failed() > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Settings { action } => match action {
            SettingsAction::Show { json } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&current)?);
                } else {
                    println!("settings file:    {}", store.path().display());
                    println!("tesseract binary: {}", current.recognition_binary.display());
                    println!("input directory:  {}", current.input_directory.display());
                    println!("output directory: {}", current.output_directory.display());
                }
                Ok(ExitCode::SUCCESS)
            }
            SettingsAction::Save => {
                store.save(&current)?;
                println!("Saved settings to {}", store.path().display());
                Ok(ExitCode::SUCCESS)
            }
        },
    }
}

fn resolve_image(config: &Configuration, image: &Path) -> PathBuf {
    if image.is_absolute() {
        image.to_path_buf()
    } else {
        config.input_directory.join(image)
    }
}

/// Ask on the terminal before replacing a file; never overwrite unattended
fn confirm_overwrite(path: &Path, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }

    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        tracing::warn!(
            "{} (pass --yes to overwrite)",
            OcrError::DestinationExists(path.to_path_buf())
        );
        return false;
    }

    eprint!("File {} already exists.\nOverwrite? [y/N] ", path.display());
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    if stdin.lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
