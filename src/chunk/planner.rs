//! Chunk planner and writer
//!
//! Transforms one in-memory dataset into a set of on-disk Parquet files,
//! none exceeding the caller-supplied size ceiling, using an
//! estimate-then-split strategy instead of exact post-hoc measurement of
//! every candidate split point.

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::output::{infer_schema, records_to_batch, write_batch_to_parquet, ParquetWriterConfig};
use crate::types::bytes_to_mb;
use arrow::datatypes::Schema;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name used when the whole dataset fits in one file
pub const SINGLE_FILE_NAME: &str = "data.parquet";

/// Default per-file size ceiling in MB, leaving headroom under a hard
/// 10 MB per-file storage limit
pub const DEFAULT_MAX_SIZE_MB: f64 = 9.0;

/// Default number of records sampled for size estimation
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Fraction of the size ceiling actually budgeted per chunk; real chunks
/// deviate from the sample-based average, so the budget is kept below the
/// ceiling
const SAFETY_FACTOR: f64 = 0.9;

/// Options for chunk planning and writing
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    max_size_mb: f64,
    sample_size: usize,
    writer: ParquetWriterConfig,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            sample_size: DEFAULT_SAMPLE_SIZE,
            writer: ParquetWriterConfig::default(),
        }
    }
}

impl ChunkOptions {
    /// Create options with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-file size ceiling in MB
    #[must_use]
    pub fn with_max_size_mb(mut self, max_size_mb: f64) -> Self {
        self.max_size_mb = max_size_mb;
        self
    }

    /// Set the number of records sampled for size estimation
    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Set the Parquet writer configuration
    #[must_use]
    pub fn with_writer(mut self, writer: ParquetWriterConfig) -> Self {
        self.writer = writer;
        self
    }

    /// Get the per-file size ceiling in MB
    #[must_use]
    pub fn max_size_mb(&self) -> f64 {
        self.max_size_mb
    }

    /// Get the sample size
    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Get the writer configuration
    #[must_use]
    pub fn writer(&self) -> &ParquetWriterConfig {
        &self.writer
    }
}

/// The chunk layout computed for one dataset
///
/// Derived, ephemeral data: computed once per dataset and never persisted
/// on its own (the conversion manifest records its numbers).
#[derive(Debug, Clone, Serialize)]
pub struct ChunkPlan {
    /// Total records in the dataset
    pub record_count: usize,
    /// Records actually sampled for estimation
    pub sample_len: usize,
    /// Estimated Parquet size per record, in MB
    pub estimated_record_mb: f64,
    /// Records budgeted per chunk file
    pub records_per_chunk: usize,
    /// Number of chunk files that will be written
    pub num_chunks: usize,
}

impl ChunkPlan {
    /// Compute a chunk layout from a per-record size estimate
    ///
    /// Fails explicitly when the estimate is unusable or when even a
    /// single record exceeds the effective budget, rather than producing
    /// a zero-progress layout.
    pub fn from_estimate(
        record_count: usize,
        sample_len: usize,
        estimated_record_mb: f64,
        max_size_mb: f64,
    ) -> Result<Self> {
        if !estimated_record_mb.is_finite() || estimated_record_mb <= 0.0 {
            return Err(Error::estimation(format!(
                "per-record size estimate is not usable: {estimated_record_mb} MB"
            )));
        }

        let budget_mb = max_size_mb * SAFETY_FACTOR;
        let records_per_chunk = (budget_mb / estimated_record_mb).floor() as usize;

        if records_per_chunk == 0 {
            return Err(Error::DegenerateChunkSize {
                estimated_mb: estimated_record_mb,
                budget_mb,
            });
        }

        Ok(Self {
            record_count,
            sample_len,
            estimated_record_mb,
            records_per_chunk,
            num_chunks: record_count.div_ceil(records_per_chunk),
        })
    }

    /// Whether the whole dataset fits in a single file
    #[must_use]
    pub fn is_single_file(&self) -> bool {
        self.num_chunks <= 1
    }
}

/// One file written by the planner
#[derive(Debug, Clone, Serialize)]
pub struct WrittenFile {
    /// Full path of the written file
    pub path: PathBuf,
    /// Rows written to the file
    pub rows: usize,
    /// On-disk size in bytes
    pub size_bytes: u64,
}

/// Result of [`plan_and_write`]: the computed plan plus the files written,
/// in chunk order
#[derive(Debug, Clone, Serialize)]
pub struct ChunkOutcome {
    pub plan: ChunkPlan,
    pub files: Vec<WrittenFile>,
}

impl ChunkOutcome {
    /// Number of files written
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Cumulative on-disk size of all written files
    #[must_use]
    pub fn total_size_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }
}

/// Build the file name for chunk `index` of `total`
///
/// Zero-padded to five digits so lexicographic sort order matches logical
/// chunk order.
pub fn chunk_file_name(index: usize, total: usize) -> String {
    format!("data-{index:05}-of-{total:05}.parquet")
}

/// Plan a chunk layout for the dataset and write its files
///
/// Creates `output_dir` if absent, estimates per-record size from a sample,
/// then writes either a single `data.parquet` or a numbered chunk sequence.
/// Records keep their original order; chunk `i` always precedes chunk `i+1`.
pub fn plan_and_write(
    dataset: &Dataset,
    output_dir: &Path,
    options: &ChunkOptions,
) -> Result<ChunkOutcome> {
    if dataset.is_empty() {
        return Err(Error::EmptyDataset);
    }

    fs::create_dir_all(output_dir)?;

    // One schema for the whole dataset; every chunk shares it
    let schema = infer_schema(dataset.records())?;

    let (estimated_record_mb, sample_len) =
        estimate_record_mb(dataset, &schema, output_dir, options)?;
    let plan = ChunkPlan::from_estimate(
        dataset.len(),
        sample_len,
        estimated_record_mb,
        options.max_size_mb(),
    )?;

    info!(
        records = plan.record_count,
        estimated_record_mb = plan.estimated_record_mb,
        records_per_chunk = plan.records_per_chunk,
        chunks = plan.num_chunks,
        "planned chunk layout"
    );

    let mut files = Vec::with_capacity(plan.num_chunks);

    if plan.is_single_file() {
        let path = output_dir.join(SINGLE_FILE_NAME);
        let batch = records_to_batch(dataset.records(), &schema)?;
        let rows = write_batch_to_parquet(&path, &batch, options.writer())?;
        let size_bytes = fs::metadata(&path)?.len();

        info!(
            path = %path.display(),
            rows,
            size_mb = bytes_to_mb(size_bytes),
            "wrote single file"
        );

        files.push(WrittenFile {
            path,
            rows,
            size_bytes,
        });
    } else {
        for index in 0..plan.num_chunks {
            let start = index * plan.records_per_chunk;
            let end = ((index + 1) * plan.records_per_chunk).min(dataset.len());

            let batch = records_to_batch(dataset.slice(start, end), &schema)?;
            let path = output_dir.join(chunk_file_name(index, plan.num_chunks));
            let rows = write_batch_to_parquet(&path, &batch, options.writer())?;
            let size_bytes = fs::metadata(&path)?.len();

            info!(
                chunk = index + 1,
                total = plan.num_chunks,
                rows,
                size_mb = bytes_to_mb(size_bytes),
                path = %path.display(),
                "wrote chunk"
            );

            files.push(WrittenFile {
                path,
                rows,
                size_bytes,
            });
        }
    }

    Ok(ChunkOutcome { plan, files })
}

/// Estimate per-record Parquet size by writing a sample to a temporary file
///
/// The temporary file lives inside the output directory and is removed on
/// every exit path by its RAII guard, including estimation failures.
fn estimate_record_mb(
    dataset: &Dataset,
    schema: &Schema,
    output_dir: &Path,
    options: &ChunkOptions,
) -> Result<(f64, usize)> {
    let sample_len = dataset.len().min(options.sample_size());
    if sample_len == 0 {
        return Err(Error::estimation("sample size must be positive"));
    }
    let sample = dataset.slice(0, sample_len);

    let temp = tempfile::Builder::new()
        .prefix(".sample-")
        .suffix(".parquet")
        .tempfile_in(output_dir)
        .map_err(|e| Error::estimation(format!("failed to create temporary sample file: {e}")))?;

    let batch = records_to_batch(sample, schema)?;
    write_batch_to_parquet(temp.path(), &batch, options.writer())?;
    let sample_bytes = fs::metadata(temp.path())?.len();

    debug!(sample_len, sample_bytes, "measured sample file");

    Ok((bytes_to_mb(sample_bytes) / sample_len as f64, sample_len))
}
