use artscan::{BatchConfig, BoundingBox, DetectorConfig};
use image::{DynamicImage, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const GRAY: Rgb<u8> = Rgb([128, 128, 128]);

/// Tile edge length for the noise block; big enough to keep edge density low
pub const NOISE_TILE: u32 = 20;

/// The rectangle used by the 1000x1000 scenario pages
pub const SCENARIO_RECT: BoundingBox = BoundingBox {
    x: 100,
    y: 100,
    width: 300,
    height: 200,
};

pub fn blank_page(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

pub fn fill_rect(page: &mut RgbImage, rect: BoundingBox, color: Rgb<u8>) {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            page.put_pixel(x, y, color);
        }
    }
}

/// Fill `rect` with square tiles of random, never-light colors
pub fn fill_noise(page: &mut RgbImage, rect: BoundingBox, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ty = rect.y;
    while ty < rect.bottom() {
        let mut tx = rect.x;
        while tx < rect.right() {
            let color = Rgb([
                rng.gen_range(0..=160u8),
                rng.gen_range(0..=160u8),
                rng.gen_range(0..=160u8),
            ]);
            let tile = BoundingBox::new(
                tx,
                ty,
                NOISE_TILE.min(rect.right() - tx),
                NOISE_TILE.min(rect.bottom() - ty),
            );
            fill_rect(page, tile, color);
            tx += NOISE_TILE;
        }
        ty += NOISE_TILE;
    }
}

/// 1000x1000 white page with a solid gray 300x200 rectangle at (100, 100)
pub fn solid_rect_page() -> DynamicImage {
    let mut page = blank_page(1000, 1000);
    fill_rect(&mut page, SCENARIO_RECT, GRAY);
    DynamicImage::ImageRgb8(page)
}

/// 1000x1000 white page with random-colored content in the same rectangle
pub fn noise_rect_page() -> DynamicImage {
    let mut page = blank_page(1000, 1000);
    fill_noise(&mut page, SCENARIO_RECT, 7);
    DynamicImage::ImageRgb8(page)
}

pub fn save_page(dir: &Path, name: &str, page: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    page.to_rgb8().save(&path).expect("Failed to save test page");
    path
}

/// Scratch workspace with a `scans/` folder and default output folder names.
/// Keep the TempDir alive for the duration of the test.
pub fn scratch_batch() -> (TempDir, BatchConfig) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    std::fs::create_dir_all(dir.path().join("scans")).expect("Failed to create scans dir");
    let mut config = BatchConfig::in_dir(dir.path());
    config.detector = DetectorConfig::scan();
    (dir, config)
}

pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// True when every coordinate is within `tolerance` pixels
pub fn roughly_equal(a: &BoundingBox, b: &BoundingBox, tolerance: u32) -> bool {
    a.x.abs_diff(b.x) <= tolerance
        && a.y.abs_diff(b.y) <= tolerance
        && a.width.abs_diff(b.width) <= tolerance
        && a.height.abs_diff(b.height) <= tolerance
}

/// Save lossless PNG data under any file name; the loader sniffs content
pub fn save_png_as(dir: &Path, name: &str, page: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    page.to_rgb8()
        .save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test page");
    path
}
