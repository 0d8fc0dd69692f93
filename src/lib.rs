//! # artscan
//!
//! Finds artwork-like rectangular regions on scanned document pages, crops
//! them out and writes an annotated copy of each page.
//!
//! ```rust,no_run
//! use artscan::{run_batch, BatchConfig, DetectorConfig};
//! use std::path::Path;
//!
//! let mut config = BatchConfig::in_dir(Path::new("."));
//! config.detector = DetectorConfig::grid();
//! let report = run_batch(&config)?;
//! println!("{} artworks", report.total_artworks());
//! # Ok::<(), artscan::ArtScanError>(())
//! ```

pub mod batch;
pub mod config;
pub mod detection;
pub mod error;
pub mod export;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod survey;

pub use batch::{run_batch, BatchConfig, BatchReport, FileOutcome, PageReport, SkipReason};
pub use config::{CandidateSource, DetectorConfig, FilterConfig, MergeConfig, MergeStrategy};
pub use detection::{build_pipeline, detect};
pub use error::{ArtScanError, Result};
pub use models::{ArtworkDetection, BoundingBox, Candidate, Contour};
pub use pipeline::{MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep};
