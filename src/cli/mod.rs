//! Kolosal Prep CLI Module
//!
//! Command-line interface for running the preprocessing walkthrough and
//! inspecting input tables.

use clap::{Parser, Subcommand};
use colored::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::data::{load_table, missing_counts};
use crate::preprocessing::PipelineConfig;
use crate::walkthrough::Walkthrough;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) {
    println!("  {:<20} {}", muted(key), val.white());
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "kolosal-prep")]
#[command(author = "KolosalAI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fit/transform preprocessing for tabular regression data")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Preprocess a table, fit ridge regression and score held-out rows
    Run {
        /// Training data file (CSV, `NA` marks absent values)
        #[arg(short, long)]
        data: PathBuf,

        /// Separate held-out file; when omitted the training file is split
        #[arg(long)]
        held_out: Option<PathBuf>,

        /// Pipeline configuration (JSON); defaults to the housing preset
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write preprocessed held-out features to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the run report to this JSON file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show table shape, column types and absent-value counts
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Print the housing preset configuration as JSON
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    Ok(match path {
        Some(p) => PipelineConfig::from_json_file(p)?,
        None => PipelineConfig::housing(),
    })
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_run(
    data_path: &Path,
    held_out_path: Option<&Path>,
    config_path: Option<&Path>,
    output: Option<&Path>,
    report_path: Option<&Path>,
) -> anyhow::Result<()> {
    section("Run");

    let config = load_config(config_path)?;
    let walkthrough = Walkthrough::new(config)?;

    step_run("Loading data");
    let start = Instant::now();
    let df = load_table(data_path)?;
    step_done(&format!("{} rows × {} cols in {:?}", df.height(), df.width(), start.elapsed()));

    step_run("Fitting pipeline and model");
    let start = Instant::now();
    let result = match held_out_path {
        Some(p) => {
            let held_out = load_table(p)?;
            walkthrough.run_split(&df, &held_out)?
        }
        None => walkthrough.run(&df)?,
    };
    step_done(&format!("{:?}", start.elapsed()));

    let report = &result.report;
    println!();
    kv("Training rows", &report.train_rows.to_string());
    kv("Held-out rows", &report.held_out_rows.to_string());
    kv("Features", &report.feature_names.len().to_string());
    for (column, count) in &report.missing_before {
        kv(&format!("Missing {}", column), &count.to_string());
    }
    println!();
    println!("  {:<20} {}", muted("Train R²"), format!("{:.4}", report.train_r2).white().bold());
    println!("  {:<20} {}", muted("Held-out R²"), format!("{:.4}", report.held_out_r2).white().bold());

    if let Some(path) = output {
        step_run(&format!("Saving → {}", path.display()));
        let mut file = std::fs::File::create(path)?;
        let mut features = result.held_out.clone();
        CsvWriter::new(&mut file).finish(&mut features)?;
        step_done(&format!("{} rows × {} cols", features.height(), features.width()));
    }

    if let Some(path) = report_path {
        std::fs::write(path, serde_json::to_string_pretty(report)?)?;
        println!("  {} report → {}", ok("✓"), path.display());
    }

    println!();
    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Info");

    let df = load_table(data_path)?;
    kv("Rows", &df.height().to_string());
    kv("Columns", &df.width().to_string());

    let missing = missing_counts(&df);
    println!();
    println!("  {:<24} {:<12} {:>8}", muted("Column"), muted("Type"), muted("Missing"));
    println!("  {}", dim(&"─".repeat(46)));
    for column in df.get_columns() {
        let name = column.name().as_str();
        let absent = missing
            .iter()
            .find(|(c, _)| c == name)
            .map(|(_, n)| *n)
            .unwrap_or(0);
        let absent = if absent > 0 { absent.to_string().yellow() } else { absent.to_string().normal() };
        println!("  {:<24} {:<12} {:>8}", name, format!("{}", column.dtype()), absent);
    }

    println!();
    Ok(())
}

pub fn cmd_config(output: Option<&Path>) -> anyhow::Result<()> {
    let json = PipelineConfig::housing().to_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)?;
            println!("  {} config → {}", ok("✓"), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
