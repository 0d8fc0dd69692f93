//! Scan folder survey tests.

mod common;

use artscan::survey::{classify_page, count_large_regions, inventory, survey, PageKind};
use common::*;
use image::{DynamicImage, GrayImage, Luma};
use tempfile::TempDir;

#[test]
fn test_inventory_groups_by_kind() {
    let dir = TempDir::new().unwrap();
    let page = DynamicImage::ImageRgb8(blank_page(20, 20));
    save_page(dir.path(), "one.png", &page);
    save_page(dir.path(), "two.bmp", &page);
    std::fs::write(dir.path().join("book.pdf"), "%PDF-1.4").unwrap();
    std::fs::write(dir.path().join("readme.txt"), "notes").unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();

    let inv = inventory(dir.path()).unwrap();
    let images: Vec<_> = inv.images.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(images, vec!["one.png", "two.bmp"]);
    assert_eq!(inv.pdfs.len(), 1);
    assert_eq!(inv.pdfs[0].size_bytes, 8);
    assert_eq!(inv.other.len(), 1);
    assert_eq!(inv.total(), 4);
    assert!(!inv.has_no_documents());
}

#[test]
fn test_inventory_of_missing_dir_fails() {
    let dir = TempDir::new().unwrap();
    assert!(inventory(&dir.path().join("gone")).is_err());
}

#[test]
fn test_text_like_page_is_classified_as_text() {
    // 4px stripes every 8px produce edges almost everywhere
    let mut gray = GrayImage::from_pixel(200, 200, Luma([255]));
    for y in 0..200 {
        for x in 0..200 {
            if x % 8 < 4 {
                gray.put_pixel(x, y, Luma([0]));
            }
        }
    }
    let (kind, density) = classify_page(&gray);
    assert_eq!(kind, PageKind::TextDocument, "density {density}");
}

#[test]
fn test_sparse_page_is_classified_as_artwork() {
    let mut page = blank_page(600, 600);
    fill_rect(&mut page, BoundingBox::new(100, 100, 300, 300), GRAY);
    let gray = DynamicImage::ImageRgb8(page).to_luma8();

    let (kind, density) = classify_page(&gray);
    assert_eq!(kind, PageKind::ArtworkPage, "density {density}");
    assert_eq!(count_large_regions(&gray), 1);
}

#[test]
fn test_survey_analyzes_up_to_limit() {
    let dir = TempDir::new().unwrap();
    for name in ["a_painting.png", "b.png", "c.png"] {
        save_page(dir.path(), name, &solid_rect_page());
    }

    let report = survey(dir.path(), 2).unwrap();
    assert_eq!(report.inventory.images.len(), 3);
    assert_eq!(report.pages.len(), 2);
    assert!(report.pages[0].name_suggests_artwork);
    assert!(!report.pages[1].name_suggests_artwork);
    assert_eq!(report.pages[0].large_regions, 1);
}
