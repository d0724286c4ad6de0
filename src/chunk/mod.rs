//! Chunk module
//!
//! Size-bounded splitting of a dataset into Parquet files.
//!
//! # Overview
//!
//! The planner samples a prefix of the dataset, writes the sample to a
//! scoped temporary file to measure real Parquet bytes per record, then
//! partitions the record sequence into contiguous chunks sized to stay
//! under the configured per-file limit. Estimation is a heuristic, so a
//! safety margin is budgeted in; it is not an exact guarantee.

mod planner;

pub use planner::{
    chunk_file_name, plan_and_write, ChunkOptions, ChunkOutcome, ChunkPlan, WrittenFile,
    DEFAULT_MAX_SIZE_MB, DEFAULT_SAMPLE_SIZE, SINGLE_FILE_NAME,
};
