//! CLI runner - executes commands

use crate::chunk::ChunkOptions;
use crate::cli::commands::{Cli, Commands};
use crate::convert::{run_conversion, ConversionSummary, ConvertOptions, PHASES};
use crate::error::{Error, Result};
use crate::types::bytes_to_mb;
use crate::validate::{sample_records, validate_dataset, DatasetReport};
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Convert {
                input_dir,
                output_dir,
                max_size_mb,
                sample_size,
                no_manifest,
            } => self.convert(input_dir, output_dir, *max_size_mb, *sample_size, *no_manifest),
            Commands::Validate {
                dataset_dir,
                max_size_mb,
                sample,
            } => self.validate(dataset_dir, *max_size_mb, *sample),
            Commands::Phases => self.phases(),
        }
    }

    /// Convert per-phase JSON inputs into Parquet shards
    fn convert(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        max_size_mb: f64,
        sample_size: usize,
        no_manifest: bool,
    ) -> Result<()> {
        if max_size_mb <= 0.0 {
            return Err(Error::config("--max-size-mb must be positive"));
        }
        if sample_size == 0 {
            return Err(Error::config("--sample-size must be positive"));
        }

        let mut options = ConvertOptions::new(input_dir, output_dir);
        options.chunk = ChunkOptions::new()
            .with_max_size_mb(max_size_mb)
            .with_sample_size(sample_size);
        options.write_manifest = !no_manifest;

        let summary = run_conversion(&options)?;
        self.print_summary(&summary);
        Ok(())
    }

    /// Print the human-readable conversion summary
    fn print_summary(&self, summary: &ConversionSummary) {
        for phase in &summary.phases {
            println!(
                "Phase {}: {} records, {} files, {:.2} MB",
                phase.phase,
                phase.records,
                phase.files.len(),
                bytes_to_mb(phase.size_bytes)
            );
            if self.cli.verbose {
                println!(
                    "  estimated {:.4} MB/record, {} records per chunk",
                    phase.estimated_record_mb, phase.records_per_chunk
                );
                for file in &phase.files {
                    println!(
                        "  {} ({} rows, {:.2} MB)",
                        file.name,
                        file.rows,
                        bytes_to_mb(file.size_bytes)
                    );
                }
            }
        }
        println!(
            "Conversion complete: {} files, {:.2} MB total",
            summary.total_files,
            summary.total_size_mb()
        );
    }

    /// Validate a converted dataset directory
    fn validate(&self, dataset_dir: &Path, max_size_mb: Option<f64>, sample: usize) -> Result<()> {
        let report = validate_dataset(dataset_dir, max_size_mb)?;
        self.print_report(&report);

        if sample > 0 {
            if let Some(first) = report.files.first() {
                println!("Sample records from {}:", first.path.display());
                for record in sample_records(&first.path, sample)? {
                    println!("  {record}");
                }
            }
        }

        if !report.schema_consistent {
            return Err(Error::validation(
                "chunk files within one directory have differing schemas",
            ));
        }
        if !report.oversized.is_empty() {
            let list = report
                .oversized
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(Error::validation(format!(
                "files exceed the size limit: {list}"
            )));
        }

        println!("Validation passed");
        Ok(())
    }

    /// Print the per-file validation report
    fn print_report(&self, report: &DatasetReport) {
        for file in &report.files {
            println!(
                "{}: {} rows, {} columns, {:.2} MB",
                file.path.display(),
                file.rows,
                file.columns.len(),
                bytes_to_mb(file.size_bytes)
            );
        }
        println!(
            "Total: {} files, {} rows, {:.2} MB",
            report.files.len(),
            report.total_rows,
            bytes_to_mb(report.total_size_bytes)
        );
    }

    /// List the fixed phase set
    fn phases(&self) -> Result<()> {
        for phase in PHASES {
            println!("{phase}");
        }
        Ok(())
    }
}
