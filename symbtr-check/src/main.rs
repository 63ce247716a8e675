//! symbtr-check - SymbTr score consistency checker
//!
//! Validates score attribute metadata, key signatures and measure offsets
//! against the canonical makam/form/usul reference data.
//!
//! Exit status: 0 valid, 1 invalid, 2 error.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use symbtr_common::config::{self, TomlConfig};
use symbtr_common::{JsonReferenceLoader, ReferenceData};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use symbtr_check::metadata::{JsonDirectoryProvider, MetadataProvider, NoMetadata};
use symbtr_check::{AttributeValidator, OffsetValidator, ValidationReport};

/// Command-line arguments for symbtr-check
#[derive(Parser, Debug)]
#[command(name = "symbtr-check")]
#[command(about = "Consistency checks for SymbTr makam music scores")]
#[command(version)]
struct Args {
    /// Configuration file (defaults to the platform config folder)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder holding makam.json, form.json and usul.json
    #[arg(short, long, env = "SYMBTR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enrich and validate the attribute metadata of a score
    Metadata {
        /// Score name: makam--form--usul--title--composer
        score_name: String,

        /// Identifier of the score's work or recording
        #[arg(long)]
        mbid: Option<String>,

        /// Folder of pre-fetched metadata records (<mbid>.json)
        #[arg(long)]
        metadata_dir: Option<PathBuf>,
    },

    /// Compare a key signature with the makam's canonical key signature
    KeySignature {
        /// Makam attribute key or slug
        makam: String,

        /// Score name used in diagnostics
        score_name: String,

        /// Accidental tokens, e.g. B4b1 F5#4
        accidentals: Vec<String>,
    },

    /// Find and validate measure starts in an offset file
    Offsets {
        /// JSON array or whitespace separated numbers
        file: PathBuf,

        /// Also print the measure start closest to this offset
        #[arg(long)]
        measure_offset: Option<f64>,
    },

    /// Write a configuration file with default settings
    InitConfig {
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    let (toml_config, origin) = config::load_toml_config_with_origin(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    init_tracing(&toml_config);
    origin.log();

    match args.command {
        Command::Metadata {
            score_name,
            mbid,
            metadata_dir,
        } => {
            let reference = load_reference(args.data_dir.as_deref(), &toml_config)?;
            match metadata_dir.or_else(|| toml_config.metadata_dir.clone()) {
                Some(dir) => {
                    let provider = JsonDirectoryProvider::new(dir);
                    info!("Metadata records: {}", provider.dir().display());
                    run_metadata(reference, provider, &toml_config, &score_name, mbid.as_deref())
                }
                None => run_metadata(reference, NoMetadata, &toml_config, &score_name, mbid.as_deref()),
            }
        }
        Command::KeySignature {
            makam,
            score_name,
            accidentals,
        } => {
            let reference = load_reference(args.data_dir.as_deref(), &toml_config)?;
            let validator =
                AttributeValidator::with_config(reference, NoMetadata, &toml_config.validation);
            let report = validator.validate_key_signature(accidentals.as_slice(), &makam, &score_name);
            print_verdict(&report);
            Ok(report.is_valid())
        }
        Command::Offsets {
            file,
            measure_offset,
        } => {
            let offsets = read_offsets(&file)?;
            let validator = OffsetValidator::from_config(&toml_config.validation);
            let (measure_start_idx, report) = validator.find_measure_start_idx(&offsets);

            println!("{}", serde_json::to_string(&measure_start_idx)?);
            if let Some(target) = measure_offset {
                match OffsetValidator::get_measure_offset_id(target, &offsets, &measure_start_idx) {
                    Some(idx) => println!("closest measure start to {}: {}", target, idx),
                    None => println!("no measure start found"),
                }
            }
            print_verdict(&report);
            Ok(report.is_valid())
        }
        Command::InitConfig { path } => {
            config::write_toml_config(&TomlConfig::default(), &path)?;
            info!("Wrote default config to {}", path.display());
            Ok(true)
        }
    }
}

fn run_metadata<P: MetadataProvider>(
    reference: ReferenceData,
    provider: P,
    toml_config: &TomlConfig,
    score_name: &str,
    mbid: Option<&str>,
) -> Result<bool> {
    let validator = AttributeValidator::with_config(reference, provider, &toml_config.validation);
    let (data, report) = validator.get_metadata(score_name, mbid)?;

    println!("{}", serde_json::to_string_pretty(&data)?);
    print_verdict(&report);
    Ok(report.is_valid())
}

fn init_tracing(toml_config: &TomlConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_reference(cli_data_dir: Option<&Path>, toml_config: &TomlConfig) -> Result<ReferenceData> {
    let data_dir = config::resolve_data_dir(cli_data_dir, toml_config);
    let loader = JsonReferenceLoader::new(data_dir);
    info!("Reference data: {}", loader.data_dir().display());
    ReferenceData::load(&loader).context("Failed to load reference data")
}

fn read_offsets(path: &Path) -> Result<Vec<f64>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON offsets in {}", path.display()));
    }

    content
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .with_context(|| format!("Invalid offset '{}' in {}", token, path.display()))
        })
        .collect()
}

fn print_verdict(report: &ValidationReport) {
    for diagnostic in report.warnings() {
        println!("  - {}", diagnostic);
    }
    println!("valid: {}", report.is_valid());
}
