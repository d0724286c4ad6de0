// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Parqshard
//!
//! A minimal, Rust-native tool for converting JSON datasets into
//! size-bounded Parquet shards.
//!
//! Large JSON datasets often have to live in repositories whose storage
//! backend enforces a per-file size limit. Parqshard loads a dataset,
//! estimates the per-record Parquet size from a small sample, and splits
//! the records into contiguous chunks so that no output file exceeds the
//! configured ceiling.
//!
//! ## Features
//!
//! - **Size-bounded output**: sample-based size estimation with a safety
//!   margin keeps every Parquet file under the configured limit
//! - **Order-preserving chunks**: chunk files concatenate back to the exact
//!   input record sequence
//! - **Arrow-native encoding**: JSON records become Arrow RecordBatches with
//!   an inferred schema shared by every chunk
//! - **Output validation**: read written shards back and verify row counts,
//!   schema consistency, and the size bound
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parqshard::chunk::{plan_and_write, ChunkOptions};
//! use parqshard::dataset::load_dataset;
//!
//! fn main() -> parqshard::Result<()> {
//!     let dataset = load_dataset("analysis/parsing-phase/data.json")?;
//!     let options = ChunkOptions::new().with_max_size_mb(9.0);
//!     let outcome = plan_and_write(&dataset, "out/parsing-phase".as_ref(), &options)?;
//!     for file in &outcome.files {
//!         println!("{} ({} rows)", file.path.display(), file.rows);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        CLI (convert)                        │
//! │  iterate fixed phases → load data.json → plan_and_write     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌───────────┬────────────────┴───────────┬────────────────────┐
//! │  Dataset  │        Chunk Planner       │       Output       │
//! ├───────────┼────────────────────────────┼────────────────────┤
//! │ JSON load │ sample → estimate → split  │ schema inference   │
//! │ shape     │ single-file / N chunks     │ Arrow RecordBatch  │
//! │ checks    │ zero-padded chunk names    │ Parquet writer     │
//! └───────────┴────────────────────────────┴────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for parqshard
pub mod error;

/// Common types and type aliases
pub mod types;

/// Dataset loading and the in-memory record model
pub mod dataset;

/// Arrow schema inference and Parquet writing
pub mod output;

/// Chunk planning and writing (size-bounded splitting)
pub mod chunk;

/// Phase-by-phase conversion driver
pub mod convert;

/// Validation of written Parquet shards
pub mod validate;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used entry points
pub use chunk::{plan_and_write, ChunkOptions, ChunkOutcome, ChunkPlan};
pub use convert::{run_conversion, ConversionSummary, ConvertOptions};
pub use dataset::{load_dataset, Dataset};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
