//! Accept/reject heuristics for candidate regions.
//!
//! Checks run cheapest first and stop at the first failure:
//!
//! 1. geometry: degenerate box, page bounds, area, aspect ratio, edge margin
//! 2. color variance of the crop in HSV
//! 3. density of a refined edge map of the crop
//!
//! The frame check runs last on accepted regions and only records a signal.
//! Rejection is an ordinary outcome, not an error.

use std::fmt;

use image::DynamicImage;
use tracing::trace;

use crate::config::FilterConfig;
use crate::detection::{color, preprocessing};
use crate::models::Candidate;

/// Hue std at or below this counts as a single flat color
const UNIFORM_HUE_STD: f32 = 1e-3;

/// Why a candidate was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Degenerate,
    OutsidePage,
    AreaTooSmall,
    AreaTooLarge,
    Aspect,
    EdgeMargin,
    UniformColor,
    LowColorVariance,
    HighColorVariance,
    TooFewEdges,
    TooManyEdges,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::Degenerate => "empty region",
            Rejection::OutsidePage => "extends past the page",
            Rejection::AreaTooSmall => "area below minimum",
            Rejection::AreaTooLarge => "area at or above maximum",
            Rejection::Aspect => "aspect ratio out of range",
            Rejection::EdgeMargin => "touches the page margin",
            Rejection::UniformColor => "uniform color",
            Rejection::LowColorVariance => "low color variance",
            Rejection::HighColorVariance => "high color variance",
            Rejection::TooFewEdges => "blank region",
            Rejection::TooManyEdges => "dense text",
        };
        f.write_str(reason)
    }
}

/// Measurements gathered while accepting a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionSignals {
    pub hue_std: f32,
    pub saturation_std: f32,
    /// Only measured when an edge density bound is configured
    pub edge_density: Option<f32>,
    /// Darker border band than core; always false without `frame_check`
    pub framed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Accepted(RegionSignals),
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Verdict::Rejected(r) => Some(*r),
            Verdict::Accepted(_) => None,
        }
    }
}

/// Conjunction of the configured checks
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    config: FilterConfig,
}

impl CandidateFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Evaluate a candidate against the full page
    pub fn evaluate(&self, candidate: &Candidate, page: &DynamicImage) -> Verdict {
        let (width, height) = (page.width(), page.height());
        if let Err(rejection) = self.check_geometry(candidate, width, height) {
            return Verdict::Rejected(rejection);
        }
        let b = candidate.bbox;
        let crop = page.crop_imm(b.x, b.y, b.width, b.height);
        self.evaluate_crop(candidate, &crop, (width, height))
    }

    pub fn accepts(&self, candidate: &Candidate, page: &DynamicImage) -> bool {
        self.evaluate(candidate, page).is_accepted()
    }

    /// Evaluate a candidate whose pixels were already cropped out of the page
    pub fn evaluate_crop(
        &self,
        candidate: &Candidate,
        crop: &DynamicImage,
        page_dims: (u32, u32),
    ) -> Verdict {
        if let Err(rejection) = self.check_geometry(candidate, page_dims.0, page_dims.1) {
            return Verdict::Rejected(rejection);
        }
        if crop.width() == 0 || crop.height() == 0 {
            return Verdict::Rejected(Rejection::Degenerate);
        }

        let hsv = color::hsv_stats(&crop.to_rgb8());
        if let Err(rejection) = self.check_color(&hsv) {
            return Verdict::Rejected(rejection);
        }

        let gray = preprocessing::to_grayscale(crop);
        let mut edge_density = None;
        if self.config.needs_edge_map() {
            let edges = preprocessing::detect_edges(
                &gray,
                self.config.refined_canny_low,
                self.config.refined_canny_high,
            );
            let density = preprocessing::edge_density(&edges);
            if let Some(min) = self.config.min_edge_density {
                if density < min {
                    return Verdict::Rejected(Rejection::TooFewEdges);
                }
            }
            if let Some(max) = self.config.max_edge_density {
                if density > max {
                    return Verdict::Rejected(Rejection::TooManyEdges);
                }
            }
            edge_density = Some(density);
        }

        let framed = self.config.frame_check
            && color::frame_contrast(&gray).is_some_and(|fc| fc.is_framed());

        trace!(
            "accepted {:?}: hue_std={:.1} sat_std={:.1} edges={:?} framed={}",
            candidate.bbox, hsv.hue_std, hsv.saturation_std, edge_density, framed
        );

        Verdict::Accepted(RegionSignals {
            hue_std: hsv.hue_std,
            saturation_std: hsv.saturation_std,
            edge_density,
            framed,
        })
    }

    /// Box-only checks; no pixels needed
    pub fn check_geometry(
        &self,
        candidate: &Candidate,
        page_width: u32,
        page_height: u32,
    ) -> Result<(), Rejection> {
        let b = &candidate.bbox;
        if b.is_empty() || candidate.area.is_nan() || candidate.area <= 0.0 {
            return Err(Rejection::Degenerate);
        }
        if !b.fits_within(page_width, page_height) {
            return Err(Rejection::OutsidePage);
        }

        if let Some(min) = self.config.min_area {
            if candidate.area < min {
                return Err(Rejection::AreaTooSmall);
            }
        }
        if let Some(max) = self.config.max_area {
            if candidate.area >= max {
                return Err(Rejection::AreaTooLarge);
            }
        }

        let aspect = b.aspect_ratio();
        if let Some(min) = self.config.min_aspect {
            if aspect < min {
                return Err(Rejection::Aspect);
            }
        }
        if let Some(max) = self.config.max_aspect {
            if aspect > max {
                return Err(Rejection::Aspect);
            }
        }

        if let Some(margin) = self.config.edge_margin {
            let near_left_or_top = b.x < margin || b.y < margin;
            let near_right = b.right() as u64 + margin as u64 > page_width as u64;
            let near_bottom = b.bottom() as u64 + margin as u64 > page_height as u64;
            if near_left_or_top || near_right || near_bottom {
                return Err(Rejection::EdgeMargin);
            }
        }

        Ok(())
    }

    fn check_color(&self, hsv: &color::HsvStats) -> Result<(), Rejection> {
        if hsv.hue_std <= UNIFORM_HUE_STD {
            return Err(Rejection::UniformColor);
        }

        if let Some(min_hue) = self.config.min_hue_std {
            let low_hue = hsv.hue_std < min_hue;
            let low_variance = match self.config.min_saturation_std {
                Some(min_sat) => low_hue && hsv.saturation_std < min_sat,
                None => low_hue,
            };
            if low_variance {
                return Err(Rejection::LowColorVariance);
            }
        }
        if let Some(max_hue) = self.config.max_hue_std {
            if hsv.hue_std > max_hue {
                return Err(Rejection::HighColorVariance);
            }
        }
        Ok(())
    }
}
