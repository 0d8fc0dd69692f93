//! End-to-end detection on synthetic pages.
//!
//! Tests cover:
//! - Flat gray rectangles produce no detections
//! - A colorful rectangle is found at its true position
//! - Every detection lies inside the page
//! - Grid scanning and pipeline composition

mod common;

use artscan::detection::grid::grid_cells;
use artscan::detection::steps::{BlurStep, EdgeDetectionStep, GrayscaleStep};
use artscan::{build_pipeline, detect, Pipeline};
use common::*;
use image::DynamicImage;
use std::sync::Arc;

#[test]
fn test_flat_gray_rectangle_is_not_artwork() {
    let detections = detect(&solid_rect_page(), &DetectorConfig::scan()).unwrap();
    assert!(detections.is_empty(), "found {detections:?}");

    let detections = detect(&solid_rect_page(), &DetectorConfig::simple()).unwrap();
    assert!(detections.is_empty(), "found {detections:?}");
}

#[test]
fn test_colorful_rectangle_is_found() {
    let detections = detect(&noise_rect_page(), &DetectorConfig::scan()).unwrap();

    assert_eq!(detections.len(), 1, "found {detections:?}");
    let found = detections[0].bbox;
    assert!(
        roughly_equal(&found, &SCENARIO_RECT, 5),
        "expected about {SCENARIO_RECT:?}, got {found:?}"
    );
    assert!(!detections[0].framed);
    assert!(detections[0].merged_from >= 1);
}

#[test]
fn test_blank_page_has_no_detections() {
    let page = DynamicImage::ImageRgb8(blank_page(800, 600));
    for config in [DetectorConfig::scan(), DetectorConfig::simple(), DetectorConfig::grid()] {
        assert!(detect(&page, &config).unwrap().is_empty());
    }
}

#[test]
fn test_detections_stay_inside_page() {
    let mut page = blank_page(900, 700);
    fill_noise(&mut page, BoundingBox::new(30, 40, 400, 300), 3);
    fill_noise(&mut page, BoundingBox::new(500, 380, 380, 300), 5);
    let page = DynamicImage::ImageRgb8(page);

    for config in [DetectorConfig::scan(), DetectorConfig::simple(), DetectorConfig::grid()] {
        for detection in detect(&page, &config).unwrap() {
            let b = detection.bbox;
            assert!(!b.is_empty());
            assert!(b.fits_within(900, 700), "{b:?} outside the page");
        }
    }
}

#[test]
fn test_grid_preset_finds_colorful_area() {
    let mut page = blank_page(800, 800);
    fill_noise(&mut page, BoundingBox::new(150, 150, 400, 400), 9);
    let detections = detect(&DynamicImage::ImageRgb8(page), &DetectorConfig::grid()).unwrap();

    assert!(!detections.is_empty());
    let content = BoundingBox::new(150, 150, 400, 400);
    for detection in &detections {
        assert!(detection.bbox.intersects(&content), "{:?}", detection.bbox);
    }
}

#[test]
fn test_grid_cells_layout() {
    let cells = grid_cells(1000, 800, 200, 150);
    // x starts 0..800 step 150 -> 6, y starts 0..600 step 150 -> 4
    assert_eq!(cells.len(), 24);
    assert_eq!(cells[0], BoundingBox::new(0, 0, 200, 200));
    assert_eq!(cells[1], BoundingBox::new(150, 0, 200, 200));
    assert_eq!(cells[6], BoundingBox::new(0, 150, 200, 200));
    assert!(cells.iter().all(|c| c.fits_within(1000, 800)));

    assert!(grid_cells(200, 200, 200, 150).is_empty());
    assert!(grid_cells(1000, 1000, 200, 0).is_empty());
}

#[test]
fn test_pipeline_step_order() {
    let contour = build_pipeline(&DetectorConfig::scan()).unwrap();
    assert_eq!(
        contour.step_names(),
        vec![
            "Grayscale Conversion",
            "Gaussian Blur",
            "Edge Detection",
            "Contour Detection",
            "Candidate Filtering",
            "Region Merge",
        ]
    );

    let grid = build_pipeline(&DetectorConfig::grid()).unwrap();
    assert_eq!(
        grid.step_names(),
        vec!["Grid Scan", "Candidate Filtering", "Region Merge"]
    );
}

#[test]
fn test_partial_run_returns_edge_map() {
    let pipeline = Pipeline::new()
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(BlurStep { sigma: 1.1 }))
        .add_step(Arc::new(EdgeDetectionStep {
            low_threshold: 30.0,
            high_threshold: 100.0,
        }));

    let data = pipeline.run_partial(noise_rect_page(), 3).unwrap();
    assert_eq!(data.len(), 1);
    let edges = data[0].image.to_luma8();
    assert_eq!(edges.dimensions(), (1000, 1000));
    assert!(edges.pixels().all(|p| p[0] == 0 || p[0] == 255));
    assert!(edges.pixels().any(|p| p[0] == 255));
    assert!(data[0].bbox.is_none());

    let gray_only = pipeline.run_partial(noise_rect_page(), 1).unwrap();
    assert!(matches!(gray_only[0].image, DynamicImage::ImageLuma8(_)));
}

#[test]
fn test_invalid_config_is_rejected_before_running() {
    let mut config = DetectorConfig::scan();
    config.preprocessing.blur_sigma = 0.0;
    let err = detect(&noise_rect_page(), &config).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn test_external_contours_skip_nested_borders() {
    use artscan::detection::contours::{find_external_contours, polygon_area};
    use image::{GrayImage, Luma};
    use imageproc::point::Point;

    // Outer ring 10..=109, inner ring 40..=59 nested inside it
    let mut edges = GrayImage::new(150, 150);
    for (lo, hi) in [(10u32, 109u32), (40, 59)] {
        for i in lo..=hi {
            for (x, y) in [(i, lo), (i, hi), (lo, i), (hi, i)] {
                edges.put_pixel(x, y, Luma([255]));
            }
        }
    }

    let found = find_external_contours(&edges);
    assert_eq!(found.len(), 1);
    let candidate = Candidate::from(&found[0]);
    assert_eq!(candidate.bbox, BoundingBox::new(10, 10, 100, 100));
    assert_eq!(candidate.area, 99.0 * 99.0);

    let square = [Point::new(0, 0), Point::new(4, 0), Point::new(4, 3), Point::new(0, 3)];
    assert_eq!(polygon_area(&square), 12.0);
    assert_eq!(polygon_area(&square[..2]), 0.0);
}
