//! Greedy clustering of accepted boxes.
//!
//! Candidates are visited in arrival order. Each one is folded into the first
//! existing cluster it is "close" to (the cluster box becomes the union),
//! otherwise it starts a new cluster. With [`MergeStrategy::Corner`] closeness
//! only looks at top-left corners, so two overlapping boxes with distant
//! corners stay apart and results depend on input order.

use crate::config::{MergeConfig, MergeStrategy};
use crate::models::BoundingBox;

/// Merged box plus the indices of the input boxes it covers
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub bbox: BoundingBox,
    pub members: Vec<usize>,
}

pub fn merge_regions(boxes: &[BoundingBox], config: &MergeConfig) -> Vec<BoundingBox> {
    merge_clusters(boxes, config)
        .into_iter()
        .map(|c| c.bbox)
        .collect()
}

pub fn merge_clusters(boxes: &[BoundingBox], config: &MergeConfig) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = boxes
        .iter()
        .enumerate()
        .map(|(idx, bbox)| Cluster {
            bbox: *bbox,
            members: vec![idx],
        })
        .collect();

    loop {
        let before = clusters.len();
        clusters = merge_pass(clusters, config);
        if !config.converge || clusters.len() == before {
            return clusters;
        }
    }
}

fn merge_pass(input: Vec<Cluster>, config: &MergeConfig) -> Vec<Cluster> {
    let mut merged: Vec<Cluster> = Vec::with_capacity(input.len());

    for cluster in input {
        match merged
            .iter_mut()
            .find(|existing| is_close(&existing.bbox, &cluster.bbox, config))
        {
            Some(existing) => {
                existing.bbox = existing.bbox.union(&cluster.bbox);
                existing.members.extend(cluster.members);
            }
            None => merged.push(cluster),
        }
    }

    merged
}

fn is_close(a: &BoundingBox, b: &BoundingBox, config: &MergeConfig) -> bool {
    match config.strategy {
        MergeStrategy::Corner => {
            a.x.abs_diff(b.x) < config.proximity && a.y.abs_diff(b.y) < config.proximity
        }
        MergeStrategy::Overlap => a.intersects(b),
    }
}
