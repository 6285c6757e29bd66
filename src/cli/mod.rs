//! Command-line interface for ihalebind.
//!
//! Provides commands for extracting tender requirements, evaluating one
//! device or a whole brand line-up, and browsing the device catalog.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::catalog::DeviceCatalog;
use crate::config::{self, ResolvedConfig};
use crate::core::ComplianceEngine;
use crate::domain::{Evaluation, EvaluationReport};
use crate::extract::Group;

/// ihalebind - Tender specification compliance checker
#[derive(Parser, Debug)]
#[command(name = "ihalebind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Device catalog JSON (overrides config and IHALEBIND_CATALOG)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the requirements extracted from a tender document
    Rules {
        /// Document text file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Only scan one device group block
        #[arg(short, long, value_enum)]
        group: Option<GroupArg>,
    },

    /// Evaluate one device against a tender document
    Evaluate {
        /// Document text file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Device brand
        #[arg(short, long)]
        brand: String,

        /// Device model
        #[arg(short, long)]
        model: String,

        /// Only scan one device group block
        #[arg(short, long, value_enum)]
        group: Option<GroupArg>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare several models of a brand against a tender document
    Compare {
        /// Document text file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Device brand
        #[arg(short, long)]
        brand: String,

        /// Models to compare (comma-separated, default: all models of the brand)
        #[arg(short, long, value_delimiter = ',')]
        models: Option<Vec<String>>,

        /// Only scan one device group block
        #[arg(short, long, value_enum)]
        group: Option<GroupArg>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List catalog brands and models
    Devices {
        /// Only list models of this brand
        #[arg(short, long)]
        brand: Option<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Device group for CLI (maps to Group)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupArg {
    /// A group block
    A,

    /// B group block
    B,
}

impl From<GroupArg> for Group {
    fn from(g: GroupArg) -> Self {
        match g {
            GroupArg::A => Group::A,
            GroupArg::B => Group::B,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let catalog_override = self.catalog;
        match self.command {
            Commands::Rules { input, group } => show_rules(input, group.map(Into::into)),
            Commands::Evaluate {
                input,
                brand,
                model,
                group,
                json,
            } => {
                let catalog = load_catalog(catalog_override.as_deref()).await?;
                evaluate_one(&catalog, input, &brand, &model, group.map(Into::into), json)
            }
            Commands::Compare {
                input,
                brand,
                models,
                group,
                json,
            } => {
                let catalog = load_catalog(catalog_override.as_deref()).await?;
                compare_models(&catalog, input, &brand, models, group.map(Into::into), json)
            }
            Commands::Devices { brand } => {
                let catalog = load_catalog(catalog_override.as_deref()).await?;
                list_devices(&catalog, brand.as_deref())
            }
            Commands::Config => show_config(catalog_override.as_deref()),
        }
    }
}

/// Engine built from the resolved configuration
fn engine(cfg: &ResolvedConfig) -> ComplianceEngine {
    ComplianceEngine::new(cfg.extraction, cfg.limits)
}

async fn load_catalog(catalog_override: Option<&Path>) -> Result<DeviceCatalog> {
    let path = match catalog_override {
        Some(path) => path.to_path_buf(),
        None => config::catalog_path()?,
    };
    DeviceCatalog::load(&path)
        .await
        .with_context(|| format!("Failed to load device catalog: {}", path.display()))
}

/// Read document text from a file or piped stdin
fn read_input(input_file: Option<PathBuf>) -> Result<String> {
    if let Some(path) = input_file {
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        anyhow::bail!("No input provided. Use --input <file> or pipe to stdin");
    }
}

/// Print extracted requirements as JSON
fn show_rules(input_file: Option<PathBuf>, group: Option<Group>) -> Result<()> {
    let cfg = config::config()?;
    let text = read_input(input_file)?;
    let prepared = engine(cfg).prepare(&text, group)?;

    eprintln!("Document: {}", prepared.document_id);
    println!("{}", serde_json::to_string_pretty(&prepared.requirements)?);
    Ok(())
}

fn evaluate_one(
    catalog: &DeviceCatalog,
    input_file: Option<PathBuf>,
    brand: &str,
    model: &str,
    group: Option<Group>,
    json: bool,
) -> Result<()> {
    let cfg = config::config()?;
    let device = catalog.get(brand, model)?;
    let text = read_input(input_file)?;

    let label = format!("{} {}", brand, model);
    let report = engine(cfg).report(&text, group, [(label, device)])?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header(&report);
    for evaluation in &report.evaluations {
        print_evaluation(evaluation);
    }
    Ok(())
}

fn compare_models(
    catalog: &DeviceCatalog,
    input_file: Option<PathBuf>,
    brand: &str,
    models: Option<Vec<String>>,
    group: Option<Group>,
    json: bool,
) -> Result<()> {
    let cfg = config::config()?;
    let devices = catalog.devices(brand, models.as_deref())?;
    if devices.is_empty() {
        anyhow::bail!("No models found for brand: {}", brand);
    }
    let text = read_input(input_file)?;
    let report = engine(cfg).report(&text, group, devices)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header(&report);
    println!("{:<30} {:<24} {:>8} {:>12}", "CİHAZ", "SONUÇ", "ZEYİL", "UYGUN DEĞİL");
    println!("{}", "-".repeat(78));
    for evaluation in &report.evaluations {
        println!(
            "{:<30} {:<24} {:>8} {:>12}",
            evaluation.device_label,
            evaluation.overall.label,
            evaluation.amendments.len(),
            evaluation.non_compliant_count()
        );
    }

    for evaluation in &report.evaluations {
        println!();
        print_evaluation(evaluation);
    }
    Ok(())
}

fn print_header(report: &EvaluationReport) {
    eprintln!("Report:   {}", report.id);
    eprintln!("Document: {}", report.document_id);
    eprintln!("Time:     {}", report.generated_at.to_rfc3339());
    eprintln!();
}

fn print_evaluation(evaluation: &Evaluation) {
    println!("═══ {} ═══", evaluation.device_label);
    println!(
        "{:<24} {:<24} {:<32} {:<12} {}",
        "KRİTER", "ŞARTNAME", "CİHAZ", "DURUM", "AÇIKLAMA"
    );
    println!("{}", "-".repeat(120));
    for verdict in &evaluation.verdicts {
        println!(
            "{:<24} {:<24} {:<32} {:<12} {}",
            verdict.clause_label,
            verdict.requirement_view,
            verdict.device_view,
            verdict.status.label(),
            verdict.explanation
        );
    }
    println!();
    println!("Genel Sonuç: {}", evaluation.overall.label);

    if !evaluation.amendments.is_empty() {
        println!();
        println!("Zeyil Önerileri:");
        for (i, text) in evaluation.amendments.iter().enumerate() {
            println!("  {}. {}", i + 1, text);
        }
    }
}

fn list_devices(catalog: &DeviceCatalog, brand: Option<&str>) -> Result<()> {
    if catalog.is_empty() {
        println!("Catalog is empty.");
        return Ok(());
    }

    let brands = match brand {
        Some(brand) => vec![brand],
        None => catalog.brands(),
    };

    for brand in brands {
        println!("{}", brand);
        for model in catalog.models(brand)? {
            println!("  {}", model);
        }
    }

    println!("\nTotal: {} models", catalog.len());
    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config(catalog_override: Option<&Path>) -> Result<()> {
    let cfg = config::config()?;

    println!("ihalebind Configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:    {}", cfg.home.display());
    match catalog_override {
        Some(path) => println!("  Catalog: {} (--catalog)", path.display()),
        None => println!("  Catalog: {}", cfg.catalog.display()),
    }
    println!();
    println!("Extraction:");
    println!("  Test block window: {} bytes", cfg.extraction.test_block_window);
    println!();
    println!("Limits:");
    println!("  Max input size: {} bytes", cfg.limits.max_input_bytes);

    Ok(())
}
