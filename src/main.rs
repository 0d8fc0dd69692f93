use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use artscan::{run_batch, survey, BatchConfig, DetectorConfig};

#[derive(Parser)]
#[command(name = "artscan")]
#[command(about = "Find and crop artwork regions on scanned pages")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect artworks in every page of a scan directory
    Detect {
        /// Directory of scanned pages (.png, .jpg, .jpeg)
        #[arg(long, default_value = "scans")]
        scans: PathBuf,

        /// Output directory for annotated pages (cleared first)
        #[arg(long, default_value = "detected_pages")]
        detected: PathBuf,

        /// Output directory for cropped artworks (cleared first)
        #[arg(long, default_value = "cropped_artworks")]
        crops: PathBuf,

        /// Built-in threshold preset: scan, simple or grid
        #[arg(long, default_value = "scan", conflicts_with = "config")]
        preset: String,

        /// JSON detector configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Save intermediate pipeline images to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,

        /// Write the batch report as JSON
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Inventory a scan directory and classify the first pages
    Survey {
        #[arg(long, default_value = "scans")]
        scans: PathBuf,

        /// Number of page images to analyze
        #[arg(long, default_value_t = 4)]
        limit: usize,
    },

    /// Write a preset as a JSON configuration file
    Config {
        #[arg(long, default_value = "scan")]
        preset: String,

        #[arg(long, default_value = "detector.json")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match args.command {
        Command::Detect {
            scans,
            detected,
            crops,
            preset,
            config,
            debug_out,
            report,
        } => {
            let detector = match config {
                Some(path) => DetectorConfig::from_json_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => preset_config(&preset)?,
            };

            let batch = BatchConfig {
                scans_dir: scans,
                annotated_dir: detected,
                crops_dir: crops,
                detector,
                debug_dir: debug_out,
            };
            let result = run_batch(&batch)?;

            println!("\n=== Artwork Detection Summary ===");
            if result.found_no_files() {
                println!("No page images found in {}", batch.scans_dir.display());
            }
            println!("Pages processed: {}", result.processed().count());
            for (file, reason) in result.skipped() {
                println!("Skipped {}: {}", file.display(), reason);
            }
            println!("Total artworks extracted: {}", result.total_artworks());
            println!("Detection results: {}/", batch.annotated_dir.display());
            println!("Cropped artworks: {}/", batch.crops_dir.display());

            if let Some(path) = report {
                let json = serde_json::to_string_pretty(&result)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
        }

        Command::Survey { scans, limit } => {
            let report = survey::survey(&scans, limit)?;
            let inv = &report.inventory;

            println!("=== Scan Folder: {} ===", scans.display());
            println!("Total files: {}", inv.total());
            for (i, f) in inv.images.iter().chain(&inv.pdfs).chain(&inv.other).enumerate() {
                println!("{:2}. {} ({:.1} KB)", i + 1, f.name, f.size_bytes as f64 / 1024.0);
            }
            println!("\nImages: {}  PDFs: {}  Other: {}", inv.images.len(), inv.pdfs.len(), inv.other.len());

            for (i, page) in report.pages.iter().enumerate() {
                println!("\n{}. {}", i + 1, page.file.display());
                println!("   Size: {}x{} pixels", page.width, page.height);
                let label = match page.kind {
                    survey::PageKind::TextDocument => "TEXT DOCUMENT",
                    survey::PageKind::ArtworkPage => "IMAGE/ARTWORK PAGE",
                };
                println!("   Likely: {} (edge density: {:.3})", label, page.edge_density);
                println!("   Large distinct regions: {}", page.large_regions);
                if page.name_suggests_artwork {
                    println!("   Name suggests artwork content");
                }
            }
        }

        Command::Config { preset, out } => {
            let config = preset_config(&preset)?;
            config.to_json_file(&out)?;
            println!("Wrote {} preset to {}", preset, out.display());
        }
    }

    Ok(())
}

fn preset_config(name: &str) -> Result<DetectorConfig> {
    DetectorConfig::preset(name)
        .with_context(|| format!("unknown preset '{name}' (expected scan, simple or grid)"))
}
