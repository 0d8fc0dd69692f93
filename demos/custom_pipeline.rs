use artscan::detection::filters::CandidateFilter;
use artscan::detection::steps::*;
use artscan::{FilterConfig, MergeConfig, MergeStrategy, Pipeline};
use image::ImageReader;
use std::env;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image_path>", args[0]);
        std::process::exit(1);
    }

    let image_path = &args[1];
    let img = ImageReader::open(image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    println!("Loaded image: {}x{}", img.width(), img.height());

    // Example 1: contour pipeline with the scan thresholds spelled out
    println!("\n=== Contour Pipeline ===");
    let scan_filter = FilterConfig {
        min_area: Some(8000.0),
        max_area: Some(200_000.0),
        min_aspect: Some(0.4),
        max_aspect: Some(2.5),
        edge_margin: Some(20),
        min_hue_std: Some(15.0),
        min_edge_density: Some(0.01),
        max_edge_density: Some(0.3),
        ..FilterConfig::permissive()
    };
    let standard_pipeline = Pipeline::new()
        .add_step_boxed(Box::new(GrayscaleStep))
        .add_step_boxed(Box::new(BlurStep { sigma: 1.1 }))
        .add_step_boxed(Box::new(EdgeDetectionStep {
            low_threshold: 30.0,
            high_threshold: 100.0,
        }))
        .add_step_boxed(Box::new(ContourDetectionStep))
        .add_step_boxed(Box::new(CandidateFilterStep {
            filter: CandidateFilter::new(scan_filter.clone()),
        }))
        .add_step_boxed(Box::new(RegionMergeStep {
            config: MergeConfig::default(),
        }));

    let detections = standard_pipeline.run(img.clone())?;

    println!("\n=== Results ===");
    println!("Total detections: {}", detections.len());
    for (i, detection) in detections.iter().enumerate() {
        let merged = detection.get_int(keys::MERGED_FROM).unwrap_or(1);
        if let Some(bbox) = &detection.bbox {
            println!(
                "  {}: {}x{} at ({}, {}) merged from {}",
                i + 1,
                bbox.width,
                bbox.height,
                bbox.x,
                bbox.y,
                merged
            );
        }
    }

    // Example 2: same candidates, overlap merging and a looser color floor
    println!("\n\n=== Custom Pipeline (Overlap Merge) ===");
    let custom_pipeline = Pipeline::new()
        .add_step_boxed(Box::new(GrayscaleStep))
        .add_step_boxed(Box::new(BlurStep { sigma: 1.5 }))
        .add_step_boxed(Box::new(EdgeDetectionStep {
            low_threshold: 30.0,
            high_threshold: 100.0,
        }))
        .add_step_boxed(Box::new(ContourDetectionStep))
        .add_step_boxed(Box::new(CandidateFilterStep {
            filter: CandidateFilter::new(FilterConfig {
                min_hue_std: Some(10.0),
                min_saturation_std: Some(20.0),
                ..scan_filter
            }),
        }))
        .add_step_boxed(Box::new(RegionMergeStep {
            config: MergeConfig {
                strategy: MergeStrategy::Overlap,
                ..MergeConfig::default()
            },
        }));

    let custom_detections = custom_pipeline.run(img.clone())?;
    println!("Custom pipeline found {} regions", custom_detections.len());

    // Example 3: grid candidates instead of contours
    println!("\n\n=== Grid Pipeline ===");
    let grid_pipeline = Pipeline::new()
        .add_step_boxed(Box::new(GridScanStep {
            cell_size: 200,
            stride: 150,
        }))
        .add_step_boxed(Box::new(CandidateFilterStep {
            filter: CandidateFilter::new(FilterConfig {
                frame_check: true,
                min_hue_std: Some(10.0),
                ..FilterConfig::permissive()
            }),
        }));

    let cells = grid_pipeline.run(img.clone())?;
    let framed = cells
        .iter()
        .filter(|c| c.get_bool(keys::FRAMED).unwrap_or(false))
        .count();
    println!("Grid pipeline kept {} cells, {} look framed", cells.len(), framed);

    // Example 4: stop after edge detection
    println!("\n\n=== Partial Pipeline (Stop After Edge Detection) ===");
    let partial_result = standard_pipeline.run_partial(img, 3)?;
    println!("Partial pipeline returned {} items", partial_result.len());
    if let Some(first) = partial_result.first() {
        println!("  First item: {}x{} edge map", first.image.width(), first.image.height());
    }

    Ok(())
}
