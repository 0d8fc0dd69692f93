//! Directory-level processing.
//!
//! [`run_batch`] walks a scan directory one page at a time: load, detect,
//! export. A page that cannot be read or written is skipped with a warning
//! and the run continues. Only a missing scan directory or an unusable
//! output directory stops the run.

use image::DynamicImage;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::DetectorConfig;
use crate::detection::{self, build_pipeline};
use crate::error::{ArtScanError, Result};
use crate::export::Exporter;
use crate::loader;
use crate::models::{ArtworkDetection, BoundingBox};

/// Everything a batch run needs
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub scans_dir: PathBuf,
    pub annotated_dir: PathBuf,
    pub crops_dir: PathBuf,
    pub detector: DetectorConfig,
    /// Save intermediate pipeline images under `<debug_dir>/<output name>/`
    pub debug_dir: Option<PathBuf>,
}

impl BatchConfig {
    /// Default folder names relative to `root`
    pub fn in_dir(root: &Path) -> Self {
        Self {
            scans_dir: root.join("scans"),
            annotated_dir: root.join("detected_pages"),
            crops_dir: root.join("cropped_artworks"),
            detector: DetectorConfig::default(),
            debug_dir: None,
        }
    }
}

/// Detection results for one page that went through the whole pipeline
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub file: PathBuf,
    pub width: u32,
    pub height: u32,
    pub detections: Vec<ArtworkDetection>,
    pub annotated: PathBuf,
    pub crops: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SkipReason {
    /// File could not be opened or decoded
    Unreadable(String),
    /// File decoded to a zero-sized image
    Empty,
    /// Detection ran but results could not be written
    ExportFailed(String),
    /// Debug image directory for this page was unusable
    DebugOutput(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable(msg) => write!(f, "could not read file: {msg}"),
            SkipReason::Empty => f.write_str("image has no pixels"),
            SkipReason::ExportFailed(msg) => write!(f, "could not write results: {msg}"),
            SkipReason::DebugOutput(msg) => write!(f, "could not write debug images: {msg}"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum FileOutcome {
    Processed(PageReport),
    Skipped { file: PathBuf, reason: SkipReason },
}

impl FileOutcome {
    pub fn file(&self) -> &Path {
        match self {
            FileOutcome::Processed(report) => &report.file,
            FileOutcome::Skipped { file, .. } => file,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Page images found in the scan directory
    pub files_found: usize,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// The scan directory held no page images
    pub fn found_no_files(&self) -> bool {
        self.files_found == 0
    }

    pub fn processed(&self) -> impl Iterator<Item = &PageReport> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Processed(report) => Some(report),
            FileOutcome::Skipped { .. } => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&Path, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Skipped { file, reason } => Some((file.as_path(), reason)),
            FileOutcome::Processed(_) => None,
        })
    }

    pub fn total_artworks(&self) -> usize {
        self.processed().map(|r| r.crops.len()).sum()
    }
}

/// Page images in `dir`, sorted by file name
pub fn list_scan_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ArtScanError::MissingInputDir {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| ArtScanError::io(dir, e))? {
        let path = entry.map_err(|e| ArtScanError::io(dir, e))?.path();
        if path.is_file() && loader::is_page_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Name used for a page's crops and debug directory.
///
/// The file stem when no other page shares it, otherwise the full file name.
/// A numeric suffix resolves whatever clashes remain.
pub fn output_names(files: &[PathBuf]) -> Vec<String> {
    let stem_of = |path: &PathBuf| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "page".to_string())
    };

    let mut stem_counts: HashMap<String, usize> = HashMap::new();
    for file in files {
        *stem_counts.entry(stem_of(file)).or_default() += 1;
    }

    let mut used = HashSet::new();
    files
        .iter()
        .map(|file| {
            let stem = stem_of(file);
            let base = if stem_counts[&stem] > 1 {
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or(stem)
            } else {
                stem
            };
            let mut name = base.clone();
            let mut suffix = 2;
            while !used.insert(name.clone()) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            name
        })
        .collect()
}

/// Process every page image in the scan directory
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    config.detector.validate()?;
    let files = list_scan_files(&config.scans_dir)?;
    info!("Found {} scan files in {}", files.len(), config.scans_dir.display());

    let exporter = Exporter::new(&config.annotated_dir, &config.crops_dir);
    exporter.prepare()?;

    let mut report = BatchReport {
        files_found: files.len(),
        outcomes: Vec::new(),
    };
    if files.is_empty() {
        warn!("No files found in {}", config.scans_dir.display());
        return Ok(report);
    }

    let names = output_names(&files);
    for (file, name) in files.iter().zip(&names) {
        let outcome = match process_file(file, name, config, &exporter) {
            Ok(outcome) => outcome,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
                let reason = match e {
                    ArtScanError::DebugOutput { .. } => SkipReason::DebugOutput(e.to_string()),
                    _ => SkipReason::ExportFailed(e.to_string()),
                };
                FileOutcome::Skipped {
                    file: file.clone(),
                    reason,
                }
            }
        };
        report.outcomes.push(outcome);
    }

    info!(
        "Processed {} of {} files, extracted {} artworks",
        report.processed().count(),
        files.len(),
        report.total_artworks()
    );
    Ok(report)
}

/// Load, detect and export a single page.
///
/// `output_name` prefixes the crop files and names the debug directory; see
/// [`output_names`].
pub fn process_file(
    path: &Path,
    output_name: &str,
    config: &BatchConfig,
    exporter: &Exporter,
) -> Result<FileOutcome> {
    info!("Processing: {}", path.display());

    let page = match loader::load_page(path) {
        Ok(page) => page,
        Err(ArtScanError::EmptyImage { .. }) => {
            warn!("Skipping {}: image has no pixels", path.display());
            return Ok(FileOutcome::Skipped {
                file: path.to_path_buf(),
                reason: SkipReason::Empty,
            });
        }
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            return Ok(FileOutcome::Skipped {
                file: path.to_path_buf(),
                reason: SkipReason::Unreadable(e.to_string()),
            });
        }
    };
    info!("  Size: {}x{}", page.width(), page.height());

    let detections = detect_page(output_name, &page, config)?;
    info!("  Found {} artwork regions", detections.len());

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("page.png");
    let boxes: Vec<BoundingBox> = detections.iter().map(|d| d.bbox).collect();
    let exported = exporter.export_page(file_name, output_name, &page, &boxes)?;

    Ok(FileOutcome::Processed(PageReport {
        file: path.to_path_buf(),
        width: page.width(),
        height: page.height(),
        detections,
        annotated: exported.annotated,
        crops: exported.crops,
    }))
}

fn detect_page(output_name: &str, page: &DynamicImage, config: &BatchConfig) -> Result<Vec<ArtworkDetection>> {
    let mut pipeline = build_pipeline(&config.detector)?;
    if let Some(debug_root) = &config.debug_dir {
        pipeline = pipeline.with_debug(debug_root.join(output_name))?;
    }
    let data = pipeline.run(page.clone())?;
    Ok(detection::detections_from(&data))
}
