use image::{DynamicImage, ImageReader};
use std::path::Path;

use crate::error::{ArtScanError, Result};

/// Extensions the detector accepts as scan pages
pub const PAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Case-insensitive check against [`PAGE_EXTENSIONS`]
pub fn is_page_image(path: &Path) -> bool {
    has_extension(path, PAGE_EXTENSIONS)
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Load a page from disk, sniffing the format from content rather than extension
pub fn load_page(path: &Path) -> Result<DynamicImage> {
    let img = ImageReader::open(path)
        .map_err(|e| ArtScanError::image_load(path, e))?
        .with_guessed_format()
        .map_err(|e| ArtScanError::image_load(path, e))?
        .decode()
        .map_err(|e| ArtScanError::image_load(path, e))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(ArtScanError::EmptyImage {
            path: path.to_path_buf(),
        });
    }
    Ok(img)
}
