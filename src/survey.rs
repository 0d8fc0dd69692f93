//! Quick look at a scan directory before running detection.
//!
//! Counts files by kind and, for the first few page images, estimates
//! whether the page is mostly text or mostly pictures from its overall edge
//! density.

use image::{GrayImage, Luma};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::detection::{contours, preprocessing};
use crate::error::{ArtScanError, Result};
use crate::loader;

const SURVEY_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];
const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// Pages denser than this in edges are classified as text
pub const TEXT_EDGE_DENSITY: f32 = 0.1;

/// Pixels brighter than this count as paper when looking for large regions
const PAPER_LUMINANCE: u8 = 200;

/// Dark regions must enclose more than this many pixels to be counted
const LARGE_REGION_AREA: f64 = 10_000.0;

const ANALYSIS_CANNY_LOW: f32 = 50.0;
const ANALYSIS_CANNY_HIGH: f32 = 150.0;

#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub size_bytes: u64,
}

/// Files in a scan directory grouped by kind
#[derive(Debug, Clone, Default, Serialize)]
pub struct FolderInventory {
    pub images: Vec<FileEntry>,
    pub pdfs: Vec<FileEntry>,
    pub other: Vec<FileEntry>,
}

impl FolderInventory {
    pub fn total(&self) -> usize {
        self.images.len() + self.pdfs.len() + self.other.len()
    }

    /// No page images and no PDFs
    pub fn has_no_documents(&self) -> bool {
        self.images.is_empty() && self.pdfs.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageKind {
    TextDocument,
    ArtworkPage,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageAnalysis {
    pub file: PathBuf,
    pub width: u32,
    pub height: u32,
    pub edge_density: f32,
    pub kind: PageKind,
    /// Dark, non-paper regions larger than 10 000 pixels
    pub large_regions: usize,
    /// File name mentions a painting or studies
    pub name_suggests_artwork: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyReport {
    pub inventory: FolderInventory,
    pub pages: Vec<PageAnalysis>,
}

/// List and classify the files of a scan directory, sorted by name
pub fn inventory(dir: &Path) -> Result<FolderInventory> {
    if !dir.is_dir() {
        return Err(ArtScanError::MissingInputDir {
            path: dir.to_path_buf(),
        });
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| ArtScanError::io(dir, e))? {
        let entry = entry.map_err(|e| ArtScanError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
        entries.push((path, size_bytes));
    }
    entries.sort();

    let mut inventory = FolderInventory::default();
    for (path, size_bytes) in entries {
        let file = FileEntry {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size_bytes,
        };
        if loader::has_extension(&path, SURVEY_IMAGE_EXTENSIONS) {
            inventory.images.push(file);
        } else if loader::has_extension(&path, PDF_EXTENSIONS) {
            inventory.pdfs.push(file);
        } else {
            inventory.other.push(file);
        }
    }
    Ok(inventory)
}

/// Classify a grayscale page by its whole-page edge density
pub fn classify_page(gray: &GrayImage) -> (PageKind, f32) {
    let edges = preprocessing::detect_edges(gray, ANALYSIS_CANNY_LOW, ANALYSIS_CANNY_HIGH);
    let density = preprocessing::edge_density(&edges);
    let kind = if density > TEXT_EDGE_DENSITY {
        PageKind::TextDocument
    } else {
        PageKind::ArtworkPage
    };
    (kind, density)
}

/// Count dark regions (non-paper pixels) whose outer border encloses a large area
pub fn count_large_regions(gray: &GrayImage) -> usize {
    let mut ink = gray.clone();
    for p in ink.pixels_mut() {
        *p = if p[0] > PAPER_LUMINANCE { Luma([0]) } else { Luma([255]) };
    }
    contours::find_external_contours(&ink)
        .iter()
        .filter(|c| c.area > LARGE_REGION_AREA)
        .count()
}

pub fn analyze_page(path: &Path) -> Result<PageAnalysis> {
    let page = loader::load_page(path)?;
    let gray = preprocessing::to_grayscale(&page);
    let (kind, edge_density) = classify_page(&gray);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    Ok(PageAnalysis {
        file: path.to_path_buf(),
        width: page.width(),
        height: page.height(),
        edge_density,
        kind,
        large_regions: count_large_regions(&gray),
        name_suggests_artwork: name.contains("painting") || name.contains("studies"),
    })
}

/// Inventory the directory and analyze up to `limit` page images
pub fn survey(dir: &Path, limit: usize) -> Result<SurveyReport> {
    let inventory = inventory(dir)?;
    if inventory.has_no_documents() {
        warn!("No image or PDF files found in {}", dir.display());
    }

    let mut pages = Vec::new();
    let image_paths: Vec<PathBuf> = inventory.images.iter().map(|f| dir.join(&f.name)).collect();
    for path in image_paths.into_iter().take(limit) {
        match analyze_page(&path) {
            Ok(analysis) => {
                debug!(
                    "{}: edge density {:.3}, {} large regions",
                    path.display(),
                    analysis.edge_density,
                    analysis.large_regions
                );
                pages.push(analysis);
            }
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    Ok(SurveyReport { inventory, pages })
}
