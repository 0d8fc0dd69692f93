#![allow(dead_code, unused_imports)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from artscan for tests
pub use artscan::{
    ArtworkDetection, BatchConfig, BoundingBox, Candidate, DetectorConfig, FileOutcome,
    FilterConfig, MergeConfig, MergeStrategy, SkipReason,
};
