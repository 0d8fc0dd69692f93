use artscan::{DetectorConfig, build_pipeline};
use image::ImageReader;
use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let image_path = env::args().nth(1).unwrap_or_else(|| "synthetic_page.png".to_string());
    let img = ImageReader::open(&image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    println!("Running the scan preset with debug output...\n");

    let debug_dir = PathBuf::from("debug_output");

    // Debug mode refuses non-empty directories
    if debug_dir.exists() {
        std::fs::remove_dir_all(&debug_dir)?;
    }

    let pipeline = build_pipeline(&DetectorConfig::scan())?.with_debug(debug_dir.clone())?;
    let result = pipeline.run(img)?;

    println!("✓ Pipeline completed!");
    println!("  Detected {} artwork regions", result.len());
    println!("\nDebug outputs saved to: {}/", debug_dir.display());
    println!("\nDirectory structure:");
    println!("  00_input/                - Original page");
    println!("  01_grayscale_conversion/ - After grayscale conversion");
    println!("  02_gaussian_blur/        - After blur");
    println!("  03_edge_detection/       - Page edge map");
    println!("  04_contour_detection/    - One crop per external contour");
    println!("  05_candidate_filtering/  - Crops that passed the filters");
    println!("  06_region_merge/         - Final merged regions");

    let mut dirs: Vec<PathBuf> = std::fs::read_dir(&debug_dir)?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    println!("\nImage counts:");
    for dir in dirs {
        let count = std::fs::read_dir(&dir)?.count();
        let name = dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        println!("  {}/ - {} files", name, count);
    }

    Ok(())
}
