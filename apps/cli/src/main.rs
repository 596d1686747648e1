//! `loom` command line tool
//!
//! Usage:
//!   loom normalize patient.json
//!   loom validate observation.json --preset publication --fhir-version R5
//!   loom validate observation.json --config validator.yaml
//!   loom config --preset ingestion

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loom_models::{FhirVersion, Resource};
use loom_validator::{Preset, Validator, ValidatorConfig};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::logging::{init_logging, LoggingConfig};

#[derive(Parser, Debug)]
#[command(name = "loom", version, about = "Normalize and validate FHIR JSON resources")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a resource and print it back in declared element order
    Normalize {
        file: PathBuf,
    },
    /// Validate a resource and print an OperationOutcome
    Validate {
        file: PathBuf,

        /// YAML validator configuration
        #[arg(short, long, conflicts_with = "preset")]
        config: Option<PathBuf>,

        /// Validator preset (ingestion, authoring, publication)
        #[arg(short, long, value_parser = parse_preset)]
        preset: Option<Preset>,

        /// FHIR release to validate against (R4, R4B, R5)
        #[arg(short = 'f', long)]
        fhir_version: Option<FhirVersion>,
    },
    /// Print the effective validator configuration as YAML
    Config {
        #[arg(short, long, value_parser = parse_preset)]
        preset: Option<Preset>,
    },
}

fn parse_preset(value: &str) -> Result<Preset, String> {
    match value.to_ascii_lowercase().as_str() {
        "ingestion" => Ok(Preset::Ingestion),
        "authoring" => Ok(Preset::Authoring),
        "publication" => Ok(Preset::Publication),
        other => Err(format!(
            "unknown preset '{other}', expected ingestion, authoring or publication"
        )),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        verbose: cli.verbose,
        json: cli.json,
    });

    match cli.command {
        Command::Normalize { file } => {
            let json = read_json(&file).await?;
            let resource = Resource::from_json_modelled(&json)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            tracing::debug!(
                resource_type = resource.resource_type(),
                id = resource.id(),
                "normalizing resource"
            );
            println!("{}", serde_json::to_string_pretty(&resource.to_json()?)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate {
            file,
            config,
            preset,
            fhir_version,
        } => {
            let mut validator_config = match config {
                Some(path) => {
                    let yaml = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    ValidatorConfig::from_yaml(&yaml)
                        .with_context(|| format!("Invalid validator config {}", path.display()))?
                }
                None => ValidatorConfig::preset(preset.unwrap_or_default()),
            };
            if let Some(version) = fhir_version {
                validator_config.fhir.version = version;
            }

            let validator = Validator::from_config(&validator_config)?;
            let json = read_json(&file).await?;
            let outcome = validator.validate(&json);

            tracing::info!(
                file = %file.display(),
                valid = outcome.valid,
                errors = outcome.error_count(),
                warnings = outcome.warning_count(),
                "validation complete"
            );
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome.to_operation_outcome())?
            );

            Ok(if outcome.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Config { preset } => {
            let config = ValidatorConfig::preset(preset.unwrap_or_default());
            print!("{}", config.to_yaml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn read_json(path: &Path) -> Result<Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}
