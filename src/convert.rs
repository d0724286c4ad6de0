//! Phase-by-phase conversion driver
//!
//! Sequences the chunk planner across the fixed set of dataset phases.
//! For each phase the driver locates `<input_root>/<phase>/data.json`,
//! skips the phase with a warning if the file is absent, and otherwise
//! writes size-bounded Parquet files into `<output_root>/<phase>`.
//! Phases run strictly one at a time; each dataset is loaded, written,
//! and discarded before the next begins.

use crate::chunk::{plan_and_write, ChunkOptions, ChunkOutcome};
use crate::dataset::load_dataset;
use crate::error::{Error, Result};
use crate::types::bytes_to_mb;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The fixed set of dataset phases, in processing order
pub const PHASES: [&str; 3] = [
    "parsing-phase",
    "name_resolution-phase",
    "type_inference-phase",
];

/// Expected input file name inside each phase directory
pub const INPUT_FILE_NAME: &str = "data.json";

/// Manifest file written at the output root
pub const MANIFEST_FILE_NAME: &str = "dataset_info.json";

/// Options for a conversion run
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Root directory holding `<phase>/data.json` inputs
    pub input_root: PathBuf,
    /// Root directory receiving `<phase>/` Parquet outputs
    pub output_root: PathBuf,
    /// Chunk planning options applied to every phase
    pub chunk: ChunkOptions,
    /// Whether to write the `dataset_info.json` manifest
    pub write_manifest: bool,
}

impl ConvertOptions {
    /// Create options with default chunking and manifest writing enabled
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            chunk: ChunkOptions::default(),
            write_manifest: true,
        }
    }
}

/// One written file, as recorded in the manifest
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub rows: usize,
    pub size_bytes: u64,
}

/// Per-phase conversion results
#[derive(Debug, Clone, Serialize)]
pub struct PhaseSummary {
    pub phase: String,
    pub records: usize,
    pub estimated_record_mb: f64,
    pub records_per_chunk: usize,
    pub files: Vec<FileSummary>,
    pub size_bytes: u64,
}

impl PhaseSummary {
    fn from_outcome(phase: &str, outcome: &ChunkOutcome) -> Self {
        let files = outcome
            .files
            .iter()
            .map(|f| FileSummary {
                name: f
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                rows: f.rows,
                size_bytes: f.size_bytes,
            })
            .collect();

        Self {
            phase: phase.to_string(),
            records: outcome.plan.record_count,
            estimated_record_mb: outcome.plan.estimated_record_mb,
            records_per_chunk: outcome.plan.records_per_chunk,
            size_bytes: outcome.total_size_bytes(),
            files,
        }
    }
}

/// Totals for a whole conversion run
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub generated_at: DateTime<Utc>,
    pub phases: Vec<PhaseSummary>,
    pub total_files: usize,
    pub total_size_bytes: u64,
}

impl ConversionSummary {
    /// Cumulative output size in MB
    pub fn total_size_mb(&self) -> f64 {
        bytes_to_mb(self.total_size_bytes)
    }
}

/// Run the conversion across all phases
///
/// A missing input root is fatal; a missing per-phase input file is a
/// warning and the phase is skipped. Any other failure aborts the run;
/// nothing is retried or rolled back.
pub fn run_conversion(options: &ConvertOptions) -> Result<ConversionSummary> {
    if !options.input_root.exists() {
        return Err(Error::not_found(&options.input_root));
    }

    fs::create_dir_all(&options.output_root)?;

    let mut phases = Vec::new();

    for phase in PHASES {
        let input = options.input_root.join(phase).join(INPUT_FILE_NAME);
        if !input.exists() {
            warn!(phase, path = %input.display(), "input file not found, skipping phase");
            continue;
        }

        let dataset = load_dataset(&input)?;
        info!(phase, records = dataset.len(), "loaded dataset");

        let output_dir = options.output_root.join(phase);
        let outcome = plan_and_write(&dataset, &output_dir, &options.chunk)?;

        info!(
            phase,
            files = outcome.file_count(),
            size_mb = bytes_to_mb(outcome.total_size_bytes()),
            "phase converted"
        );

        phases.push(PhaseSummary::from_outcome(phase, &outcome));
    }

    let summary = ConversionSummary {
        generated_at: Utc::now(),
        total_files: phases.iter().map(|p| p.files.len()).sum(),
        total_size_bytes: phases.iter().map(|p| p.size_bytes).sum(),
        phases,
    };

    if options.write_manifest {
        write_manifest(&options.output_root, &summary)?;
    }

    Ok(summary)
}

/// Write the conversion manifest to the output root
fn write_manifest(output_root: &Path, summary: &ConversionSummary) -> Result<()> {
    let path = output_root.join(MANIFEST_FILE_NAME);
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(&path, json)?;
    info!(path = %path.display(), "wrote dataset manifest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn write_phase_input(root: &Path, phase: &str, records: &serde_json::Value) {
        let dir = root.join(phase);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(INPUT_FILE_NAME), records.to_string()).unwrap();
    }

    #[test]
    fn test_run_conversion_missing_input_root() {
        let dir = tempdir().unwrap();
        let options = ConvertOptions::new(dir.path().join("absent"), dir.path().join("out"));

        let err = run_conversion(&options).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_run_conversion_skips_missing_phases() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("analysis");
        let output = dir.path().join("repo");

        // Only one of the three phases has data
        write_phase_input(
            &input,
            "parsing-phase",
            &json!([{"id": 1, "node": "fn"}, {"id": 2, "node": "struct"}]),
        );

        let options = ConvertOptions::new(&input, &output);
        let summary = run_conversion(&options).unwrap();

        assert_eq!(summary.phases.len(), 1);
        assert_eq!(summary.phases[0].phase, "parsing-phase");
        assert_eq!(summary.phases[0].records, 2);
        assert_eq!(summary.total_files, 1);
        assert!(output.join("parsing-phase").join("data.parquet").exists());
        assert!(!output.join("name_resolution-phase").exists());
    }

    #[test]
    fn test_run_conversion_all_phases_missing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("analysis");
        fs::create_dir_all(&input).unwrap();

        let options = ConvertOptions::new(&input, dir.path().join("repo"));
        let summary = run_conversion(&options).unwrap();

        // The run completes; it just has nothing to report
        assert!(summary.phases.is_empty());
        assert_eq!(summary.total_files, 0);
        assert_eq!(summary.total_size_bytes, 0);
    }

    #[test]
    fn test_run_conversion_writes_manifest() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("analysis");
        let output = dir.path().join("repo");

        write_phase_input(
            &input,
            "type_inference-phase",
            &json!([{"expr": "x + y", "ty": "i64"}]),
        );

        let options = ConvertOptions::new(&input, &output);
        let summary = run_conversion(&options).unwrap();

        let manifest_path = output.join(MANIFEST_FILE_NAME);
        assert!(manifest_path.exists());

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
        assert_eq!(manifest["total_files"], summary.total_files);
        assert_eq!(manifest["total_size_bytes"], summary.total_size_bytes);
        assert_eq!(manifest["phases"][0]["phase"], "type_inference-phase");
        assert_eq!(manifest["phases"][0]["records"], 1);
    }

    #[test]
    fn test_run_conversion_manifest_disabled() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("analysis");
        let output = dir.path().join("repo");

        write_phase_input(&input, "parsing-phase", &json!([{"id": 1}]));

        let mut options = ConvertOptions::new(&input, &output);
        options.write_manifest = false;
        run_conversion(&options).unwrap();

        assert!(!output.join(MANIFEST_FILE_NAME).exists());
    }

    #[test]
    fn test_run_conversion_malformed_phase_is_fatal() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("analysis");
        let output = dir.path().join("repo");

        let phase_dir = input.join("parsing-phase");
        fs::create_dir_all(&phase_dir).unwrap();
        fs::write(phase_dir.join(INPUT_FILE_NAME), "not json at all").unwrap();

        let options = ConvertOptions::new(&input, &output);
        assert!(run_conversion(&options).is_err());
    }

    #[test]
    fn test_run_conversion_totals_match_disk() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("analysis");
        let output = dir.path().join("repo");

        write_phase_input(
            &input,
            "parsing-phase",
            &json!([{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]),
        );
        write_phase_input(&input, "name_resolution-phase", &json!([{"sym": "x"}]));

        let options = ConvertOptions::new(&input, &output);
        let summary = run_conversion(&options).unwrap();

        assert_eq!(summary.phases.len(), 2);
        assert_eq!(summary.total_files, 2);

        let disk_total: u64 = summary
            .phases
            .iter()
            .flat_map(|p| p.files.iter())
            .map(|f| f.size_bytes)
            .sum();
        assert_eq!(summary.total_size_bytes, disk_total);
        assert!(summary.total_size_mb() > 0.0);
    }
}
