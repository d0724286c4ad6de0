//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parqshard CLI
#[derive(Parser, Debug)]
#[command(name = "parqshard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output (per-file detail)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert per-phase JSON datasets into size-bounded Parquet files
    Convert {
        /// Directory containing `<phase>/data.json` inputs
        input_dir: PathBuf,

        /// Directory receiving `<phase>/` Parquet outputs
        output_dir: PathBuf,

        /// Maximum size of a single output file in MB
        #[arg(long, default_value_t = 9.0)]
        max_size_mb: f64,

        /// Number of records sampled for size estimation
        #[arg(long, default_value_t = 100)]
        sample_size: usize,

        /// Skip writing the dataset_info.json manifest
        #[arg(long)]
        no_manifest: bool,
    },

    /// Validate Parquet files produced by `convert`
    Validate {
        /// Directory holding the converted dataset
        dataset_dir: PathBuf,

        /// Flag files larger than this many MB
        #[arg(long)]
        max_size_mb: Option<f64>,

        /// Print up to N sample records from the first file
        #[arg(long, default_value_t = 0)]
        sample: usize,
    },

    /// List the dataset phases processed by `convert`
    Phases,
}
