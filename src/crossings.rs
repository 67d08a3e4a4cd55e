//! Detecting crossed handles ("laser beams").
//!
//! In a well-behaved cubic segment, the two handles point towards each other
//! without meeting. When the line through one handle crosses the line
//! through the other one *within the extent of the handles themselves*, the
//! curve has probably got a kink or a loop.

use crate::{
    geom::{bounding_rect_contains, intersect},
    outline::Path,
    Layer, NodeIdx, PathIdx, Point,
};

/// A place where the handles of a cubic segment cross.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Crossing {
    /// The on-curve node ending the segment.
    pub end: NodeIdx,
    /// Where the handle lines intersect.
    pub point: Point,
    /// The on-curve point ending the segment. Markers draw an arm from the
    /// intersection to here.
    pub arm_a: Point,
    /// The on-curve point starting the segment. Markers draw an arm from the
    /// intersection to here.
    pub arm_b: Point,
    /// Does the intersection sit exactly on one of the control points?
    ///
    /// This happens when a control point lies on the line through the other
    /// handle, which is usually harmless, so it gets a softer marker.
    pub smooth: bool,
}

/// Finds all crossed handles in `path`.
///
/// For each cubic segment, with on-curve end `a`, control points `b` and `c`
/// and on-curve start `d` (reading backwards from the end), we intersect the
/// lines `ab` and `cd`. The intersection counts as a crossing if it lies in
/// the bounding box of `ab` or in the bounding box of `dc`.
pub fn find_crossings(path: &Path) -> Vec<Crossing> {
    path.indices()
        .filter_map(|idx| {
            let [a, b, c, d] = path.cubic_ending_at(idx)?.map(|i| path[i].point);
            let point = intersect(a, b, c, d)?;
            if !bounding_rect_contains(a, b, point) && !bounding_rect_contains(d, c, point) {
                return None;
            }
            Some(Crossing {
                end: idx,
                point,
                arm_a: a,
                arm_b: d,
                smooth: point == b || point == c,
            })
        })
        .collect()
}

/// Finds the crossed handles in every path of `layer`.
pub fn crossings_in(layer: &Layer) -> Vec<(PathIdx, Crossing)> {
    layer
        .paths()
        .iter()
        .flat_map(|(path_idx, path)| {
            find_crossings(path)
                .into_iter()
                .map(move |crossing| (path_idx, crossing))
        })
        .collect()
}
