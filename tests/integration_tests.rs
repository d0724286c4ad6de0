//! Integration tests for the full conversion flow
//!
//! Exercises the pipeline end to end: JSON inputs on disk → chunk planning →
//! Parquet shards → manifest, validation, and read-back.

use clap::Parser;
use parqshard::chunk::{chunk_file_name, ChunkOptions};
use parqshard::cli::{Cli, Commands};
use parqshard::convert::{run_conversion, ConvertOptions, INPUT_FILE_NAME, MANIFEST_FILE_NAME};
use parqshard::output::ParquetWriterConfig;
use parqshard::validate::{read_all_records, validate_dataset};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use walkdir::WalkDir;

// ============================================================================
// Helpers
// ============================================================================

/// Uniform records with distinct payloads of roughly `payload_len` bytes
fn build_records(count: usize, payload_len: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let payload: String = (0..payload_len)
                .map(|j| char::from(b'a' + ((i * 31 + j * 7) % 26) as u8))
                .collect();
            json!({"id": i as i64, "payload": payload})
        })
        .collect()
}

/// Write a phase's data.json under the input root
fn write_phase(input_root: &Path, phase: &str, records: &[Value]) {
    let dir = input_root.join(phase);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(INPUT_FILE_NAME),
        serde_json::to_string(&records).unwrap(),
    )
    .unwrap();
}

/// Sorted list of Parquet files directly inside a directory
fn parquet_files(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "parquet"))
        .collect();
    paths.sort();
    paths
}

// ============================================================================
// End-to-End Conversion Tests
// ============================================================================

#[test]
fn test_convert_single_phase_single_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("analysis");
    let output = dir.path().join("repo");

    let records = build_records(20, 32);
    write_phase(&input, "parsing-phase", &records);

    let summary = run_conversion(&ConvertOptions::new(&input, &output)).unwrap();

    assert_eq!(summary.total_files, 1);
    let file = output.join("parsing-phase").join("data.parquet");
    assert!(file.exists());

    // The single file reproduces the input sequence exactly
    let readback = read_all_records(&file).unwrap();
    assert_eq!(readback, records);
}

#[test]
fn test_convert_multi_chunk_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("analysis");
    let output = dir.path().join("repo");

    let records = build_records(120, 512);
    write_phase(&input, "name_resolution-phase", &records);

    let mut options = ConvertOptions::new(&input, &output);
    options.chunk = ChunkOptions::new()
        .with_max_size_mb(0.02)
        .with_writer(ParquetWriterConfig::new().uncompressed());

    let summary = run_conversion(&options).unwrap();
    assert!(summary.total_files > 1);

    let phase_dir = output.join("name_resolution-phase");
    let files = parquet_files(&phase_dir);
    assert_eq!(files.len(), summary.total_files);

    // Names embed zero-padded index and total, in lexicographic order
    for (index, path) in files.iter().enumerate() {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(name, chunk_file_name(index, files.len()));
    }

    // Concatenating chunks in file-name order reproduces the input exactly
    let mut readback = Vec::new();
    for path in &files {
        readback.extend(read_all_records(path).unwrap());
    }
    assert_eq!(readback, records);
}

#[test]
fn test_convert_respects_size_bound_for_uniform_records() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("analysis");
    let output = dir.path().join("repo");

    write_phase(&input, "parsing-phase", &build_records(120, 512));

    let mut options = ConvertOptions::new(&input, &output);
    options.chunk = ChunkOptions::new()
        .with_max_size_mb(0.02)
        .with_writer(ParquetWriterConfig::new().uncompressed());

    run_conversion(&options).unwrap();

    // Uniform records estimate accurately; the validator enforces the bound
    let report = validate_dataset(&output, Some(0.02)).unwrap();
    assert!(report.oversized.is_empty());
    assert!(report.schema_consistent);
    assert!(report.is_ok());
}

#[test]
fn test_convert_missing_phases_are_tolerated() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("analysis");
    let output = dir.path().join("repo");

    // Two of three phases present
    write_phase(&input, "parsing-phase", &build_records(5, 16));
    write_phase(&input, "type_inference-phase", &build_records(7, 16));

    let summary = run_conversion(&ConvertOptions::new(&input, &output)).unwrap();

    assert_eq!(summary.phases.len(), 2);
    assert_eq!(summary.total_files, 2);
    assert!(output.join("parsing-phase").join("data.parquet").exists());
    assert!(output.join("type_inference-phase").join("data.parquet").exists());
    assert!(!output.join("name_resolution-phase").exists());
}

#[test]
fn test_convert_writes_manifest_matching_disk() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("analysis");
    let output = dir.path().join("repo");

    write_phase(&input, "parsing-phase", &build_records(10, 64));

    let summary = run_conversion(&ConvertOptions::new(&input, &output)).unwrap();

    let manifest: Value =
        serde_json::from_str(&fs::read_to_string(output.join(MANIFEST_FILE_NAME)).unwrap())
            .unwrap();

    assert_eq!(manifest["total_files"], summary.total_files);
    assert_eq!(manifest["phases"][0]["records"], 10);

    let disk_size = fs::metadata(output.join("parsing-phase").join("data.parquet"))
        .unwrap()
        .len();
    assert_eq!(manifest["total_size_bytes"], disk_size);
}

#[test]
fn test_convert_leaves_no_temporary_files() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("analysis");
    let output = dir.path().join("repo");

    write_phase(&input, "parsing-phase", &build_records(50, 128));
    write_phase(&input, "name_resolution-phase", &build_records(30, 128));

    run_conversion(&ConvertOptions::new(&input, &output)).unwrap();

    let leftovers: Vec<PathBuf> = WalkDir::new(&output)
        .into_iter()
        .filter_map(Result::ok)
        .map(walkdir::DirEntry::into_path)
        .filter(|p| {
            p.file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with(".sample-"))
        })
        .collect();
    assert!(leftovers.is_empty(), "leftover sample files: {leftovers:?}");
}

#[test]
fn test_convert_degenerate_sizing_is_fatal() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("analysis");
    let output = dir.path().join("repo");

    // ~2 KB records against a ~1 KB ceiling
    write_phase(&input, "parsing-phase", &build_records(10, 2048));

    let mut options = ConvertOptions::new(&input, &output);
    options.chunk = ChunkOptions::new()
        .with_max_size_mb(0.001)
        .with_writer(ParquetWriterConfig::new().uncompressed());

    let err = run_conversion(&options).unwrap_err();
    assert!(matches!(
        err,
        parqshard::Error::DegenerateChunkSize { .. }
    ));
}

#[test]
fn test_convert_empty_dataset_is_explicit_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("analysis");
    let output = dir.path().join("repo");

    write_phase(&input, "parsing-phase", &[]);

    let err = run_conversion(&ConvertOptions::new(&input, &output)).unwrap_err();
    assert!(matches!(err, parqshard::Error::EmptyDataset));
}

// ============================================================================
// CLI Parsing Tests
// ============================================================================

#[test]
fn test_cli_convert_requires_two_directories() {
    assert!(Cli::try_parse_from(["parqshard", "convert"]).is_err());
    assert!(Cli::try_parse_from(["parqshard", "convert", "only-input"]).is_err());
    assert!(Cli::try_parse_from(["parqshard", "convert", "in", "out", "extra"]).is_err());
}

#[test]
fn test_cli_convert_defaults() {
    let cli = Cli::try_parse_from(["parqshard", "convert", "in", "out"]).unwrap();
    match cli.command {
        Commands::Convert {
            input_dir,
            output_dir,
            max_size_mb,
            sample_size,
            no_manifest,
        } => {
            assert_eq!(input_dir, PathBuf::from("in"));
            assert_eq!(output_dir, PathBuf::from("out"));
            assert!((max_size_mb - 9.0).abs() < f64::EPSILON);
            assert_eq!(sample_size, 100);
            assert!(!no_manifest);
        }
        other => panic!("expected convert command, got: {other:?}"),
    }
}

#[test]
fn test_cli_validate_parses() {
    let cli = Cli::try_parse_from([
        "parqshard",
        "validate",
        "repo",
        "--max-size-mb",
        "10",
        "--sample",
        "3",
    ])
    .unwrap();
    match cli.command {
        Commands::Validate {
            dataset_dir,
            max_size_mb,
            sample,
        } => {
            assert_eq!(dataset_dir, PathBuf::from("repo"));
            assert_eq!(max_size_mb, Some(10.0));
            assert_eq!(sample, 3);
        }
        other => panic!("expected validate command, got: {other:?}"),
    }
}
