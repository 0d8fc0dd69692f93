//! Region merger tests.
//!
//! Tests cover:
//! - Corner-proximity merging of nearby boxes into their union
//! - Distant boxes staying separate
//! - Stability of converged output
//! - Single-pass order dependence
//! - The opt-in overlap strategy

mod common;

use artscan::detection::merge::{merge_clusters, merge_regions};
use common::*;

fn bb(x: u32, y: u32, w: u32, h: u32) -> BoundingBox {
    BoundingBox::new(x, y, w, h)
}

#[test]
fn test_close_corners_merge_into_union() {
    let merged = merge_regions(&[bb(10, 10, 100, 100), bb(40, 40, 100, 100)], &MergeConfig::default());
    assert_eq!(merged, vec![bb(10, 10, 130, 130)]);
}

#[test]
fn test_distant_corners_stay_separate() {
    let input = [bb(10, 10, 50, 50), bb(500, 500, 50, 50)];
    let merged = merge_regions(&input, &MergeConfig::default());
    assert_eq!(merged, input.to_vec());
}

#[test]
fn test_proximity_is_exclusive() {
    let config = MergeConfig::default();
    let merged = merge_regions(&[bb(0, 0, 10, 10), bb(50, 0, 10, 10)], &config);
    assert_eq!(merged.len(), 2, "a 50px corner gap must not merge at proximity 50");

    let merged = merge_regions(&[bb(0, 0, 10, 10), bb(49, 49, 10, 10)], &config);
    assert_eq!(merged, vec![bb(0, 0, 59, 59)]);
}

#[test]
fn test_overlapping_boxes_with_distant_corners_do_not_merge() {
    // Big box fully contains the small one, but the corners are 100px apart
    let merged = merge_regions(&[bb(0, 0, 400, 400), bb(100, 100, 20, 20)], &MergeConfig::default());
    assert_eq!(merged.len(), 2);
}

#[test]
fn test_overlap_strategy_merges_contained_boxes() {
    let config = MergeConfig {
        strategy: MergeStrategy::Overlap,
        ..MergeConfig::default()
    };
    let merged = merge_regions(&[bb(0, 0, 400, 400), bb(100, 100, 20, 20)], &config);
    assert_eq!(merged, vec![bb(0, 0, 400, 400)]);

    let merged = merge_regions(&[bb(0, 0, 10, 10), bb(10, 0, 10, 10)], &config);
    assert_eq!(merged.len(), 2, "touching edges do not overlap");
}

#[test]
fn test_single_pass_can_leave_close_corners() {
    // A at x=100 and B at x=30 are 70px apart; C at x=60 joins A and drags its corner to 60,
    // now 30px from B
    let input = [bb(100, 0, 20, 20), bb(30, 0, 20, 20), bb(60, 0, 20, 20)];
    let single = MergeConfig {
        converge: false,
        ..MergeConfig::default()
    };
    let once = merge_regions(&input, &single);
    assert_eq!(once, vec![bb(60, 0, 60, 20), bb(30, 0, 20, 20)]);

    let converged = merge_regions(&input, &MergeConfig::default());
    assert_eq!(converged, vec![bb(30, 0, 90, 20)]);
}

#[test]
fn test_converged_merge_is_idempotent() {
    let input: Vec<BoundingBox> = (0..40u32)
        .map(|i| bb((i * 37) % 400, (i * 53) % 300, 30 + i % 7, 25 + i % 5))
        .collect();
    let config = MergeConfig::default();

    let once = merge_regions(&input, &config);
    let twice = merge_regions(&once, &config);
    assert_eq!(once, twice);

    for (i, a) in once.iter().enumerate() {
        for b in &once[i + 1..] {
            assert!(
                a.x.abs_diff(b.x) >= config.proximity || a.y.abs_diff(b.y) >= config.proximity,
                "{a:?} and {b:?} should have merged"
            );
        }
    }
}

#[test]
fn test_clusters_track_members_and_cover_them() {
    let input = [bb(10, 10, 100, 100), bb(500, 500, 50, 50), bb(40, 40, 100, 100)];
    let clusters = merge_clusters(&input, &MergeConfig::default());

    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].members, vec![0, 2]);
    assert_eq!(clusters[1].members, vec![1]);
    for cluster in &clusters {
        for &idx in &cluster.members {
            assert_eq!(cluster.bbox.union(&input[idx]), cluster.bbox);
        }
    }
}

#[test]
fn test_empty_input() {
    assert!(merge_regions(&[], &MergeConfig::default()).is_empty());
}
