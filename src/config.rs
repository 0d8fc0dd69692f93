//! Detector configuration.
//!
//! Every threshold the detector uses lives here, grouped by pipeline stage.
//! Three presets capture the parameter sets the detector has been run with:
//!
//! - [`DetectorConfig::scan`]: contour source with the full filter chain (default)
//! - [`DetectorConfig::simple`]: contour source, area range only
//! - [`DetectorConfig::grid`]: fixed-cell grid scan with color, edge and frame checks
//!
//! The presets disagree on thresholds for the same filters and none of them
//! is authoritative. Configurations round-trip through JSON:
//!
//! ```no_run
//! use artscan::DetectorConfig;
//! use std::path::Path;
//!
//! let config = DetectorConfig::from_json_file(Path::new("detector.json"))?;
//! config.to_json_file(Path::new("detector-copy.json"))?;
//! # Ok::<(), artscan::ArtScanError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ArtScanError, Result};

/// Complete detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Smoothing and page-level edge detection
    pub preprocessing: PreprocessingConfig,

    /// Where candidate boxes come from
    pub source: CandidateSource,

    /// Accept/reject heuristics applied to each candidate
    pub filter: FilterConfig,

    /// Clustering of accepted candidates
    pub merge: MergeConfig,
}

/// Page-level pass: grayscale, blur, Canny.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Gaussian blur sigma (1.1 matches a 5x5 kernel)
    pub blur_sigma: f32,

    pub canny_low: f32,
    pub canny_high: f32,
}

/// Candidate box generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateSource {
    /// External contours of the page edge map
    Contours,

    /// Square windows of `cell_size` pixels every `stride` pixels
    Grid { cell_size: u32, stride: u32 },
}

/// Candidate filter thresholds.
///
/// `None` disables a check. Ranges are inclusive except `max_area`, which is
/// exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,

    /// Bounds on width / height
    pub min_aspect: Option<f32>,
    pub max_aspect: Option<f32>,

    /// Reject boxes closer than this to any page edge
    pub edge_margin: Option<u32>,

    /// Hue standard deviation floor (8-bit HSV scale, 0-180)
    pub min_hue_std: Option<f32>,

    /// When set, a region is only rejected for low color variance if its
    /// saturation std is also below this floor
    pub min_saturation_std: Option<f32>,

    pub max_hue_std: Option<f32>,

    /// Bounds on edge pixels / box area of the refined edge map
    pub min_edge_density: Option<f32>,
    pub max_edge_density: Option<f32>,

    /// Canny thresholds for the refined per-region edge map
    pub refined_canny_low: f32,
    pub refined_canny_high: f32,

    /// Record whether the region has a darker border band than its core
    pub frame_check: bool,
}

/// Merge proximity test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Top-left corners closer than `proximity` on both axes
    Corner,

    /// Boxes share at least one pixel. Changes detection counts compared to
    /// `Corner`; opt in explicitly.
    Overlap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    pub strategy: MergeStrategy,

    /// Corner distance in pixels, per axis, exclusive
    pub proximity: u32,

    /// Repeat the greedy pass until nothing merges. With `false` a single
    /// pass runs and two output boxes may still be within `proximity`.
    pub converge: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::scan()
    }
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.1,
            canny_low: 30.0,
            canny_high: 100.0,
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            strategy: MergeStrategy::Corner,
            proximity: 50,
            converge: true,
        }
    }
}

impl FilterConfig {
    /// No checks besides the ones every candidate goes through
    pub fn permissive() -> Self {
        Self {
            min_area: None,
            max_area: None,
            min_aspect: None,
            max_aspect: None,
            edge_margin: None,
            min_hue_std: None,
            min_saturation_std: None,
            max_hue_std: None,
            min_edge_density: None,
            max_edge_density: None,
            refined_canny_low: 50.0,
            refined_canny_high: 150.0,
            frame_check: false,
        }
    }

    /// Whether the region crop needs a refined edge map
    pub fn needs_edge_map(&self) -> bool {
        self.min_edge_density.is_some() || self.max_edge_density.is_some()
    }
}

impl DetectorConfig {
    /// Contour candidates with geometry, color variance and edge density checks
    pub fn scan() -> Self {
        Self {
            preprocessing: PreprocessingConfig::default(),
            source: CandidateSource::Contours,
            filter: FilterConfig {
                min_area: Some(8000.0),
                max_area: Some(200_000.0),
                min_aspect: Some(0.4),
                max_aspect: Some(2.5),
                edge_margin: Some(20),
                min_hue_std: Some(15.0),
                min_edge_density: Some(0.01),
                max_edge_density: Some(0.3),
                ..FilterConfig::permissive()
            },
            merge: MergeConfig::default(),
        }
    }

    /// Contour candidates filtered by area only
    pub fn simple() -> Self {
        Self {
            preprocessing: PreprocessingConfig::default(),
            source: CandidateSource::Contours,
            filter: FilterConfig {
                min_area: Some(3000.0),
                max_area: Some(100_000.0),
                ..FilterConfig::permissive()
            },
            merge: MergeConfig::default(),
        }
    }

    /// Fixed 200px cells every 150px, no area filter
    pub fn grid() -> Self {
        Self {
            preprocessing: PreprocessingConfig::default(),
            source: CandidateSource::Grid {
                cell_size: 200,
                stride: 150,
            },
            filter: FilterConfig {
                min_aspect: Some(0.3),
                max_aspect: Some(3.0),
                min_hue_std: Some(10.0),
                min_saturation_std: Some(20.0),
                min_edge_density: Some(0.005),
                max_edge_density: Some(0.3),
                frame_check: true,
                ..FilterConfig::permissive()
            },
            merge: MergeConfig::default(),
        }
    }

    /// Look up a preset by name ("scan", "simple", "grid")
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "scan" => Some(Self::scan()),
            "simple" => Some(Self::simple()),
            "grid" => Some(Self::grid()),
            _ => None,
        }
    }

    /// Reject values the image operators cannot work with
    pub fn validate(&self) -> Result<()> {
        let pre = &self.preprocessing;
        if pre.blur_sigma.is_nan() || pre.blur_sigma <= 0.0 {
            return Err(ArtScanError::invalid("preprocessing.blur_sigma", pre.blur_sigma));
        }
        check_canny("preprocessing.canny", pre.canny_low, pre.canny_high)?;
        check_canny(
            "filter.refined_canny",
            self.filter.refined_canny_low,
            self.filter.refined_canny_high,
        )?;

        if let CandidateSource::Grid { cell_size, stride } = self.source {
            if cell_size == 0 {
                return Err(ArtScanError::invalid("source.cell_size", cell_size));
            }
            if stride == 0 {
                return Err(ArtScanError::invalid("source.stride", stride));
            }
        }

        let f = &self.filter;
        if let (Some(min), Some(max)) = (f.min_area, f.max_area) {
            if min >= max {
                return Err(ArtScanError::invalid("filter.area", format!("[{min}, {max})")));
            }
        }
        if let (Some(min), Some(max)) = (f.min_aspect, f.max_aspect) {
            if min > max {
                return Err(ArtScanError::invalid("filter.aspect", format!("[{min}, {max}]")));
            }
        }
        if let (Some(min), Some(max)) = (f.min_edge_density, f.max_edge_density) {
            if min > max {
                return Err(ArtScanError::invalid(
                    "filter.edge_density",
                    format!("[{min}, {max}]"),
                ));
            }
        }
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ArtScanError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| ArtScanError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| ArtScanError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| ArtScanError::io(path, e))
    }
}

fn check_canny(name: &str, low: f32, high: f32) -> Result<()> {
    if low.is_nan() || high.is_nan() || low < 0.0 || high < low {
        return Err(ArtScanError::invalid(name, format!("({low}, {high})")));
    }
    Ok(())
}
