//! Command-line argument definitions.

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use super::OutputFormat;

/// Export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values
    Csv,
    /// JSON Lines (one JSON object per row)
    Json,
    /// Apache Parquet columnar format
    Parquet,
}

impl ExportFormat {
    /// Infer export format from file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "csv" => Some(ExportFormat::Csv),
                "json" | "jsonl" | "ndjson" => Some(ExportFormat::Json),
                "parquet" | "pq" => Some(ExportFormat::Parquet),
                _ => None,
            })
    }
}

/// Inspect per-branch storage statistics of a ROOT file.
#[derive(Parser, Debug)]
#[command(name = "rootstat")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// ROOT file to inspect
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Tree (container) to analyze
    #[arg(long = "tree", value_name = "NAME", default_value = "CollectionTree")]
    pub tree: String,

    /// List the trees in the file and exit
    #[arg(long = "list-trees")]
    pub list_trees: bool,

    /// Number of branches in the top listing
    #[arg(long = "top", value_name = "N", default_value = "20")]
    pub top: usize,

    /// Run the value-statistics pass over vector<float> branches
    #[arg(long = "stats")]
    pub stats: bool,

    /// Exclude branches containing SUBSTR from the value-statistics pass
    #[arg(long = "exclude", value_name = "SUBSTR")]
    pub exclude: Vec<String>,

    /// Write per-branch value statistics to a CSV file (implies --stats)
    #[arg(long = "csv", value_name = "CSV_FILE")]
    pub csv: Option<PathBuf>,

    /// Execute a single SQL query against the branches table and exit
    #[arg(short = 'e', long = "sql", value_name = "QUERY")]
    pub query: Option<String>,

    /// Output format for stdout
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Export query results to file
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Export format (inferred from extension if not specified)
    #[arg(long = "export-format", value_enum, value_name = "FORMAT")]
    pub export_format: Option<ExportFormat>,

    /// Directory for generated figures
    #[arg(long = "plots", value_name = "DIR")]
    pub plots: Option<PathBuf>,

    /// Plot a value-distribution histogram for a branch (repeatable)
    #[arg(long = "hist", value_name = "BRANCH")]
    pub hist: Vec<String>,

    /// Reduction threshold (percent) for the per-branch figure
    #[arg(long = "reduction-threshold", value_name = "PCT", default_value = "40.0")]
    pub reduction_threshold: f64,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}
