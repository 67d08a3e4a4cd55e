//! Detecting duplicated outline pieces.
//!
//! Overlapping copies of a segment are invisible in the editor (they render
//! on top of each other) but cause trouble later, so we look for them
//! explicitly.

use std::collections::BTreeMap;

use crate::{
    geom::Segment,
    outline::{Layer, PathIdx},
    NodeIdx, Point,
};

/// A segment that has an exact copy somewhere in the same layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DuplicateSegment {
    /// The path containing the segment.
    pub path: PathIdx,
    /// The on-curve node that ends the segment.
    pub end: NodeIdx,
    /// The duplicated segment, in the orientation of `path`.
    pub segment: Segment,
}

/// Finds all segments in `layer` that are identical to some other segment,
/// either in the same direction or reversed.
///
/// Every member of a group of copies is reported, once, in outline order.
pub fn find_duplicate_segments(layer: &Layer) -> Vec<DuplicateSegment> {
    let all: Vec<DuplicateSegment> = layer
        .paths()
        .iter()
        .flat_map(|(path_idx, path)| {
            path.segments().map(move |(end, segment)| DuplicateSegment {
                path: path_idx,
                end,
                segment,
            })
        })
        .filter(|dup| dup.segment.is_finite())
        .collect();

    // Equal segments have equal endpoints (up to order), so we only need to
    // compare within buckets.
    let mut buckets: BTreeMap<(Point, Point), Vec<usize>> = BTreeMap::new();
    for (idx, dup) in all.iter().enumerate() {
        buckets
            .entry(dup.segment.endpoint_key())
            .or_default()
            .push(idx);
    }

    let mut duplicated = vec![false; all.len()];
    for bucket in buckets.values().filter(|b| b.len() > 1) {
        for (i, &first) in bucket.iter().enumerate() {
            for &second in &bucket[i + 1..] {
                if all[first].segment.same_as(&all[second].segment) {
                    duplicated[first] = true;
                    duplicated[second] = true;
                }
            }
        }
    }

    tracing::trace!(
        segments = all.len(),
        duplicates = duplicated.iter().filter(|&&d| d).count(),
        "compared segments"
    );

    all.into_iter()
        .zip(duplicated)
        .filter_map(|(dup, is_dup)| is_dup.then_some(dup))
        .collect()
}

/// Finds all paths that are exact copies of an earlier path in the layer.
///
/// This is coarser than [`find_duplicate_segments`]: paths must have the same
/// nodes, starting at the same place and going in the same direction, and
/// the same open/closed state. The first path of each group of copies isn't
/// reported, and each later copy is reported once.
pub fn find_duplicate_paths(layer: &Layer) -> Vec<PathIdx> {
    let paths = layer.paths();
    paths
        .iter()
        .filter(|&(idx, path)| {
            paths
                .iter()
                .take_while(|&(earlier, _)| earlier < idx)
                .any(|(_, earlier)| same_nodes(earlier, path))
        })
        .map(|(idx, _)| idx)
        .collect()
}

fn same_nodes(a: &crate::Path, b: &crate::Path) -> bool {
    a.is_closed() == b.is_closed()
        && a.len() == b.len()
        && a
            .nodes()
            .values()
            .zip(b.nodes().values())
            .all(|(m, n)| m.point == n.point && m.kind == n.kind)
}
