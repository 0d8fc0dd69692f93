pub mod color;
pub mod contours;
pub mod filters;
pub mod grid;
pub mod merge;
pub mod preprocessing;
pub mod steps;

use image::DynamicImage;
use std::sync::Arc;

use crate::config::{CandidateSource, DetectorConfig};
use crate::error::Result;
use crate::models::ArtworkDetection;
use crate::pipeline::{Pipeline, PipelineData};
use filters::CandidateFilter;
use steps::*;

/// Build the detection pipeline described by `config`.
///
/// Contour source: grayscale → blur → edges → contours → filter → merge.
/// Grid source: grid cells → filter → merge.
pub fn build_pipeline(config: &DetectorConfig) -> Result<Pipeline> {
    config.validate()?;

    let pre = &config.preprocessing;
    let pipeline = match config.source {
        CandidateSource::Contours => Pipeline::new()
            .add_step(Arc::new(GrayscaleStep))
            .add_step(Arc::new(BlurStep { sigma: pre.blur_sigma }))
            .add_step(Arc::new(EdgeDetectionStep {
                low_threshold: pre.canny_low,
                high_threshold: pre.canny_high,
            }))
            .add_step(Arc::new(ContourDetectionStep)),
        CandidateSource::Grid { cell_size, stride } => {
            Pipeline::new().add_step(Arc::new(GridScanStep { cell_size, stride }))
        }
    };

    Ok(pipeline
        .add_step(Arc::new(CandidateFilterStep {
            filter: CandidateFilter::new(config.filter.clone()),
        }))
        .add_step(Arc::new(RegionMergeStep {
            config: config.merge.clone(),
        })))
}

/// Run detection on one page and return the merged regions
pub fn detect(img: &DynamicImage, config: &DetectorConfig) -> Result<Vec<ArtworkDetection>> {
    let pipeline = build_pipeline(config)?;
    let data = pipeline.run(img.clone())?;
    Ok(detections_from(&data))
}

/// Read merged regions back out of pipeline output
pub fn detections_from(data: &[PipelineData]) -> Vec<ArtworkDetection> {
    data.iter()
        .filter_map(|item| {
            item.bbox.map(|bbox| ArtworkDetection {
                bbox,
                merged_from: item
                    .get_int(keys::MERGED_FROM)
                    .map(|n| n.max(1) as usize)
                    .unwrap_or(1),
                framed: item.get_bool(keys::FRAMED).unwrap_or(false),
            })
        })
        .collect()
}
