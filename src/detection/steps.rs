use image::{DynamicImage, GenericImageView};
use tracing::{debug, trace};

use crate::config::MergeConfig;
use crate::detection::filters::{CandidateFilter, Verdict};
use crate::detection::{contours, grid, merge, preprocessing};
use crate::error::Result;
use crate::models::{BoundingBox, Candidate};
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};

/// Metadata keys written by the steps below
pub mod keys {
    pub const AREA: &str = "area";
    pub const HUE_STD: &str = "hue_std";
    pub const SATURATION_STD: &str = "saturation_std";
    pub const EDGE_DENSITY: &str = "edge_density";
    pub const FRAMED: &str = "framed";
    pub const MERGED_FROM: &str = "merged_from";
}

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let gray = preprocessing::to_grayscale(&item.image);
                item.with_image(DynamicImage::ImageLuma8(gray))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Apply Gaussian blur
pub struct BlurStep {
    pub sigma: f32,
}

impl PipelineStep for BlurStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let blurred = preprocessing::apply_blur(&item.image.to_luma8(), self.sigma);
                item.with_image(DynamicImage::ImageLuma8(blurred))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }
}

/// Detect edges using Canny
pub struct EdgeDetectionStep {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl PipelineStep for EdgeDetectionStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let edges = preprocessing::detect_edges(
                    &item.image.to_luma8(),
                    self.low_threshold,
                    self.high_threshold,
                );
                item.with_image(DynamicImage::ImageLuma8(edges))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Edge Detection"
    }
}

/// Find external contours in the edge map - splits one page into many regions
pub struct ContourDetectionStep;

impl PipelineStep for ContourDetectionStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let edges = item.image.to_luma8();
            let found = contours::find_external_contours(&edges);
            let (page_width, page_height) = item.original.dimensions();
            debug!("Found {} external contours", found.len());

            for contour in found {
                let Some(bbox) = contour.bbox().clamp_to(page_width, page_height) else {
                    continue;
                };
                let cropped = item.original.crop_imm(bbox.x, bbox.y, bbox.width, bbox.height);
                result.push(
                    PipelineData::from_region(cropped, item.original.clone(), bbox)
                        .with_metadata(keys::AREA, MetadataValue::Float(contour.area as f32)),
                );
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Contour Detection"
    }
}

/// Cut the page into fixed square cells - splits one page into many regions
pub struct GridScanStep {
    pub cell_size: u32,
    pub stride: u32,
}

impl PipelineStep for GridScanStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let (page_width, page_height) = item.original.dimensions();
            let cells = grid::grid_cells(page_width, page_height, self.cell_size, self.stride);
            debug!("Scanning {} grid cells", cells.len());

            for bbox in cells {
                let cropped = item.original.crop_imm(bbox.x, bbox.y, bbox.width, bbox.height);
                result.push(
                    PipelineData::from_region(cropped, item.original.clone(), bbox)
                        .with_metadata(keys::AREA, MetadataValue::Float(bbox.area() as f32)),
                );
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Grid Scan"
    }
}

/// Keep only regions the candidate filter accepts
pub struct CandidateFilterStep {
    pub filter: CandidateFilter,
}

impl PipelineStep for CandidateFilterStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let total = data.len();
        let mut result = Vec::new();

        for item in data {
            let page_dims = item.original.dimensions();
            let bbox = item
                .bbox
                .unwrap_or_else(|| BoundingBox::new(0, 0, page_dims.0, page_dims.1));
            let candidate = Candidate {
                bbox,
                area: item
                    .get_float(keys::AREA)
                    .map(f64::from)
                    .unwrap_or(bbox.area() as f64),
            };

            match self.filter.evaluate_crop(&candidate, &item.image, page_dims) {
                Verdict::Accepted(signals) => {
                    let mut accepted = item
                        .with_metadata(keys::HUE_STD, MetadataValue::Float(signals.hue_std))
                        .with_metadata(
                            keys::SATURATION_STD,
                            MetadataValue::Float(signals.saturation_std),
                        )
                        .with_metadata(keys::FRAMED, MetadataValue::Bool(signals.framed));
                    if let Some(density) = signals.edge_density {
                        accepted = accepted
                            .with_metadata(keys::EDGE_DENSITY, MetadataValue::Float(density));
                    }
                    result.push(accepted);
                }
                Verdict::Rejected(reason) => {
                    trace!("Rejected {:?}: {}", bbox, reason);
                }
            }
        }

        debug!("Accepted {} of {} candidates", result.len(), total);
        Ok(result)
    }

    fn name(&self) -> &str {
        "Candidate Filtering"
    }
}

/// Merge nearby accepted regions into final detections
pub struct RegionMergeStep {
    pub config: MergeConfig,
}

impl PipelineStep for RegionMergeStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let Some(original) = data.first().map(|item| item.original.clone()) else {
            return Ok(Vec::new());
        };
        let regions: Vec<&PipelineData> = data.iter().filter(|item| item.bbox.is_some()).collect();
        let boxes: Vec<BoundingBox> = regions.iter().filter_map(|item| item.bbox).collect();

        let clusters = merge::merge_clusters(&boxes, &self.config);
        debug!("Merged {} regions into {}", boxes.len(), clusters.len());

        Ok(clusters
            .into_iter()
            .map(|cluster| {
                let framed = cluster
                    .members
                    .iter()
                    .any(|&idx| regions[idx].get_bool(keys::FRAMED).unwrap_or(false));
                let b = cluster.bbox;
                let cropped = original.crop_imm(b.x, b.y, b.width, b.height);
                PipelineData::from_region(cropped, original.clone(), b)
                    .with_metadata(keys::MERGED_FROM, MetadataValue::Int(cluster.members.len() as i64))
                    .with_metadata(keys::FRAMED, MetadataValue::Bool(framed))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Region Merge"
    }
}
