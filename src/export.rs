//! Writing detection results to disk.
//!
//! Each page produces one annotated copy (`detected_<file name>`) in the
//! annotated directory and one JPEG per region (`<name>_artwork_<n>.jpg`,
//! `n` starting at 1) in the crops directory. `<name>` is chosen by the
//! caller, normally the file stem.

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ArtScanError, Result};
use crate::models::BoundingBox;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_THICKNESS: u32 = 3;

/// Files written for one page
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPage {
    pub annotated: PathBuf,
    pub crops: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Exporter {
    pub annotated_dir: PathBuf,
    pub crops_dir: PathBuf,
}

impl Exporter {
    pub fn new(annotated_dir: impl Into<PathBuf>, crops_dir: impl Into<PathBuf>) -> Self {
        Self {
            annotated_dir: annotated_dir.into(),
            crops_dir: crops_dir.into(),
        }
    }

    /// Create both output directories, removing files left by earlier runs
    pub fn prepare(&self) -> Result<()> {
        clear_or_create(&self.annotated_dir)?;
        clear_or_create(&self.crops_dir)
    }

    pub fn export_page(
        &self,
        file_name: &str,
        crop_name: &str,
        page: &DynamicImage,
        regions: &[BoundingBox],
    ) -> Result<ExportedPage> {
        let mut crops = Vec::with_capacity(regions.len());
        for region in regions {
            let Some(b) = region.clamp_to(page.width(), page.height()) else {
                continue;
            };
            let path = self.crops_dir.join(crop_file_name(crop_name, crops.len() + 1));
            page.crop_imm(b.x, b.y, b.width, b.height)
                .to_rgb8()
                .save(&path)
                .map_err(|e| ArtScanError::Export {
                    path: path.clone(),
                    source: e,
                })?;
            debug!("Cropped artwork: {}", path.display());
            crops.push(path);
        }

        let annotated = self.annotated_dir.join(format!("detected_{file_name}"));
        annotate(page, regions)
            .save(&annotated)
            .map_err(|e| ArtScanError::Export {
                path: annotated.clone(),
                source: e,
            })?;
        debug!("Saved detection: {}", annotated.display());

        Ok(ExportedPage { annotated, crops })
    }
}

pub fn crop_file_name(name: &str, index: usize) -> String {
    format!("{name}_artwork_{index}.jpg")
}

/// Copy of the page with every region outlined
pub fn annotate(page: &DynamicImage, regions: &[BoundingBox]) -> RgbImage {
    let mut canvas = page.to_rgb8();
    for region in regions {
        // Nested outlines, outermost on the region border
        for inset in 0..BOX_THICKNESS {
            let (w, h) = (
                region.width.saturating_sub(2 * inset),
                region.height.saturating_sub(2 * inset),
            );
            if w == 0 || h == 0 {
                break;
            }
            let rect = Rect::at((region.x + inset) as i32, (region.y + inset) as i32).of_size(w, h);
            draw_hollow_rect_mut(&mut canvas, rect, BOX_COLOR);
        }
    }
    canvas
}

fn clear_or_create(dir: &Path) -> Result<()> {
    let to_output_err = |e: std::io::Error| ArtScanError::OutputDir {
        path: dir.to_path_buf(),
        source: e,
    };

    if dir.exists() {
        for entry in std::fs::read_dir(dir).map_err(to_output_err)? {
            let path = entry.map_err(to_output_err)?.path();
            if path.is_file() {
                std::fs::remove_file(&path).map_err(to_output_err)?;
            }
        }
    } else {
        std::fs::create_dir_all(dir).map_err(to_output_err)?;
    }
    Ok(())
}
