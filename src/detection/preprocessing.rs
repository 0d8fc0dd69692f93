use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Apply Gaussian blur to suppress scan noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Number of non-zero pixels in a binary edge map
pub fn count_edge_pixels(edges: &GrayImage) -> u64 {
    edges.pixels().filter(|p| p[0] > 0).count() as u64
}

/// Fraction of edge pixels, 0.0 for an empty map
pub fn edge_density(edges: &GrayImage) -> f32 {
    let total = edges.width() as u64 * edges.height() as u64;
    if total == 0 {
        return 0.0;
    }
    count_edge_pixels(edges) as f32 / total as f32
}
