//! Error types for artscan.
//!
//! Errors split into two groups. Fatal ones stop a batch before or during
//! setup (missing scan directory, unusable output directory, bad config).
//! Everything else belongs to a single page; the batch runner turns those
//! into [`crate::batch::FileOutcome::Skipped`] and moves on.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for artscan operations
pub type Result<T> = std::result::Result<T, ArtScanError>;

#[derive(Debug, Error)]
pub enum ArtScanError {
    /// Scan directory does not exist.
    #[error("Scan directory not found: '{path}'")]
    MissingInputDir { path: PathBuf },

    /// Image file could not be opened or decoded.
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Image decoded but has zero width or height.
    #[error("Image '{path}' has no pixels")]
    EmptyImage { path: PathBuf },

    /// Writing a crop, annotated page or debug image failed.
    #[error("Failed to write '{path}': {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Output directory could not be created or cleared.
    #[error("Cannot prepare output directory '{path}': {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Per-page debug image directory is unusable.
    #[error("Cannot write debug images to '{path}': {message}")]
    DebugOutput { path: PathBuf, message: String },

    /// Filesystem error outside the output directories.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is unreadable or malformed.
    #[error("Invalid configuration '{path}': {message}")]
    Config { path: PathBuf, message: String },

    /// A configuration value is out of its valid range.
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },
}

impl ArtScanError {
    pub fn image_load<E>(path: impl Into<PathBuf>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoad {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn debug_output(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::DebugOutput {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Whether this error should abort a whole batch rather than one page
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ArtScanError::MissingInputDir { .. }
                | ArtScanError::OutputDir { .. }
                | ArtScanError::Io { .. }
                | ArtScanError::Config { .. }
                | ArtScanError::InvalidParameter { .. }
        )
    }
}
