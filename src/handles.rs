//! Classifying handles and straight lines.
//!
//! A handle is the off-curve node together with the on-curve node it is
//! attached to (its [anchor](crate::Path::anchor)). Designers usually want
//! handles to be exactly horizontal or vertical, and lines that look straight
//! to actually be straight, so we flag the near misses.

use crate::{geom::angle_degrees, outline::Path, Layer, NodeIdx, NodeRef, PathIdx};

/// Handles whose offsets along both axes exceed this are never "almost
/// straight" unless their angle is.
pub const NEAR_STRAIGHT_MAX_OFFSET: f64 = 2.0;

/// How far (in degrees) a handle may be from horizontal or vertical and still
/// count as "almost straight".
pub const NEAR_STRAIGHT_MAX_ANGLE: f64 = 8.0;

/// Lines that are off by at most this much in one direction are considered
/// intentionally straight (or at least indistinguishable from it).
pub const MIN_LINE_DEVIATION: f64 = 0.1;

/// Lines that are off by at least this much in both directions are clearly
/// diagonal on purpose.
pub const MAX_LINE_DEVIATION: f64 = 20.0;

/// Which angled handles to report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandleFilter {
    /// Every handle that isn't exactly horizontal or vertical.
    #[default]
    All,
    /// Only angled handles that are close to horizontal or vertical, which are
    /// likely to be mistakes. Intentional diagonals are left alone.
    NearlyStraight,
}

/// A line segment that is close to horizontal or vertical, but not exactly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NonStraightLine {
    /// The node the line starts at.
    pub from: NodeIdx,
    /// The node the line ends at.
    pub to: NodeIdx,
    /// How prominently to draw the line, between 0 and 1: lines that are
    /// nearly straight get drawn more strongly.
    pub opacity: f64,
}

/// Finds all off-curve nodes whose handle is neither horizontal nor vertical.
///
/// Off-curve nodes that aren't attached to any on-curve node are skipped.
pub fn find_angled_handles(path: &Path, filter: HandleFilter) -> Vec<NodeIdx> {
    path.indices()
        .filter(|&idx| {
            let Some(anchor) = path.anchor(idx) else {
                return false;
            };
            let node = path[idx].point;
            let anchor = path[anchor].point;
            let dx = node.x - anchor.x;
            let dy = node.y - anchor.y;
            if dx * dy == 0.0 {
                return false;
            }

            match filter {
                HandleFilter::All => true,
                HandleFilter::NearlyStraight => {
                    let angle = angle_degrees(node, anchor).rem_euclid(90.0);
                    dx.abs() <= NEAR_STRAIGHT_MAX_OFFSET
                        || dy.abs() <= NEAR_STRAIGHT_MAX_OFFSET
                        || angle < NEAR_STRAIGHT_MAX_ANGLE
                        || angle > 90.0 - NEAR_STRAIGHT_MAX_ANGLE
                }
            }
        })
        .collect()
}

/// Finds all off-curve nodes that sit exactly on top of their anchor.
pub fn find_zero_handles(path: &Path) -> Vec<NodeIdx> {
    path.indices()
        .filter(|&idx| {
            path.anchor(idx)
                .is_some_and(|anchor| path[anchor].point == path[idx].point)
        })
        .collect()
}

/// Finds all line segments that are almost, but not quite, horizontal or
/// vertical.
pub fn find_non_straight_lines(path: &Path) -> Vec<NonStraightLine> {
    path.indices()
        .filter_map(|to| {
            let node = &path[to];
            if !node.is_on_curve() {
                return None;
            }
            let from = path.prev(to).filter(|&p| p != to && path[p].is_on_curve())?;
            let prev = &path[from];

            let dx = (node.point.x - prev.point.x).abs();
            let dy = (node.point.y - prev.point.y).abs();
            let deviation = dx.min(dy);
            if deviation > MIN_LINE_DEVIATION && deviation < MAX_LINE_DEVIATION {
                Some(NonStraightLine {
                    from,
                    to,
                    opacity: (3.0 / deviation).min(1.0),
                })
            } else {
                None
            }
        })
        .collect()
}

/// Finds the angled handles in every path of `layer`.
pub fn angled_handles_in(layer: &Layer, filter: HandleFilter) -> Vec<NodeRef> {
    node_refs(layer, |path| find_angled_handles(path, filter))
}

/// Finds the zero handles in every path of `layer`.
pub fn zero_handles_in(layer: &Layer) -> Vec<NodeRef> {
    node_refs(layer, find_zero_handles)
}

/// Finds the almost-straight lines in every path of `layer`.
pub fn non_straight_lines_in(layer: &Layer) -> Vec<(PathIdx, NonStraightLine)> {
    layer
        .paths()
        .iter()
        .flat_map(|(path_idx, path)| {
            find_non_straight_lines(path)
                .into_iter()
                .map(move |line| (path_idx, line))
        })
        .collect()
}

fn node_refs(layer: &Layer, find: impl Fn(&Path) -> Vec<NodeIdx>) -> Vec<NodeRef> {
    layer
        .paths()
        .iter()
        .flat_map(|(path, p)| find(p).into_iter().map(move |node| NodeRef { path, node }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Node, Path};

    // An on-curve node at the origin, followed by one control point.
    fn handle(x: f64, y: f64) -> Path {
        Path::closed([
            Node::on_curve(0.0, 0.0),
            Node::off_curve(x, y),
            Node::off_curve(100.0, 100.0),
            Node::on_curve(100.0, 100.0),
        ])
    }

    #[test]
    fn angled() {
        assert_eq!(
            find_angled_handles(&handle(5.0, 3.0), HandleFilter::All),
            vec![NodeIdx(1)]
        );
        assert!(find_angled_handles(&handle(5.0, 0.0), HandleFilter::All).is_empty());
        assert!(find_angled_handles(&handle(0.0, 3.0), HandleFilter::All).is_empty());
    }

    #[test]
    fn angled_uses_next_anchor() {
        let path = Path::closed([
            Node::on_curve(0.0, 0.0),
            Node::off_curve(0.0, 50.0),
            Node::off_curve(40.0, 90.0),
            Node::on_curve(100.0, 100.0),
        ]);
        // The second control point is attached to (100, 100).
        assert_eq!(
            find_angled_handles(&path, HandleFilter::All),
            vec![NodeIdx(2)]
        );
    }

    #[test]
    fn nearly_straight_filter() {
        let diagonal = handle(50.0, 50.0);
        assert_eq!(
            find_angled_handles(&diagonal, HandleFilter::All),
            vec![NodeIdx(1)]
        );
        assert!(find_angled_handles(&diagonal, HandleFilter::NearlyStraight).is_empty());

        let almost_vertical = handle(1.0, 50.0);
        assert_eq!(
            find_angled_handles(&almost_vertical, HandleFilter::NearlyStraight),
            vec![NodeIdx(1)]
        );

        // 5 degrees off horizontal, with both offsets well above the threshold.
        let rad = 5.0f64.to_radians();
        let shallow = handle(100.0 * rad.cos(), 100.0 * rad.sin());
        assert_eq!(
            find_angled_handles(&shallow, HandleFilter::NearlyStraight),
            vec![NodeIdx(1)]
        );

        // Same thing, but pointing down and to the left.
        let shallow = handle(-100.0 * rad.cos(), -100.0 * rad.sin());
        assert_eq!(
            find_angled_handles(&shallow, HandleFilter::NearlyStraight),
            vec![NodeIdx(1)]
        );

        // 30 degrees is a deliberate diagonal.
        let rad = 30.0f64.to_radians();
        let steep = handle(100.0 * rad.cos(), 100.0 * rad.sin());
        assert!(find_angled_handles(&steep, HandleFilter::NearlyStraight).is_empty());
    }

    #[test]
    fn zero_handles() {
        assert_eq!(find_zero_handles(&handle(0.0, 0.0)), vec![NodeIdx(1), NodeIdx(2)]);
        assert_eq!(find_zero_handles(&handle(0.001, 0.0)), vec![NodeIdx(2)]);
    }

    #[test]
    fn orphaned_control_points_are_skipped() {
        let path = Path::closed([
            Node::off_curve(0.0, 0.0),
            Node::off_curve(5.0, 3.0),
            Node::off_curve(5.0, 3.0),
        ]);
        assert!(find_angled_handles(&path, HandleFilter::All).is_empty());
        assert!(find_zero_handles(&path).is_empty());
        assert!(find_non_straight_lines(&path).is_empty());
    }

    #[test]
    fn non_straight_lines() {
        let path = Path::closed([
            Node::on_curve(0.0, 0.0),
            // Off by 1 unit: nearly straight, drawn at full opacity.
            Node::on_curve(100.0, 1.0),
            // Off by 10 units: reported, but faded.
            Node::on_curve(110.0, 101.0),
            // Exactly vertical.
            Node::on_curve(110.0, 200.0),
            // Off by 0.05 units: too small to matter.
            Node::on_curve(0.0, 200.05),
        ]);
        let lines = find_non_straight_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].from, lines[0].to), (NodeIdx(0), NodeIdx(1)));
        assert_eq!(lines[0].opacity, 1.0);
        assert_eq!((lines[1].from, lines[1].to), (NodeIdx(1), NodeIdx(2)));
        assert!((lines[1].opacity - 0.3).abs() < 1e-12);
    }

    #[test]
    fn clearly_diagonal_lines_are_fine() {
        let path = Path::open([Node::on_curve(0.0, 0.0), Node::on_curve(50.0, 40.0)]);
        assert!(find_non_straight_lines(&path).is_empty());
    }

    #[test]
    fn layer_findings_point_into_their_paths() {
        let layer = Layer::new([
            Path::open([Node::on_curve(0.0, 0.0), Node::on_curve(100.0, 0.0)]),
            handle(5.0, 3.0),
            handle(0.0, 0.0),
            Path::open([Node::on_curve(0.0, 0.0), Node::on_curve(100.0, 2.0)]),
        ]);
        assert_eq!(
            angled_handles_in(&layer, HandleFilter::All),
            vec![NodeRef {
                path: PathIdx(1),
                node: NodeIdx(1)
            }]
        );
        assert_eq!(
            zero_handles_in(&layer),
            vec![
                NodeRef {
                    path: PathIdx(1),
                    node: NodeIdx(2)
                },
                NodeRef {
                    path: PathIdx(2),
                    node: NodeIdx(1)
                },
                NodeRef {
                    path: PathIdx(2),
                    node: NodeIdx(2)
                },
            ]
        );
        let lines = non_straight_lines_in(&layer);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, PathIdx(3));
        assert_eq!((lines[0].1.from, lines[0].1.to), (NodeIdx(0), NodeIdx(1)));
    }
}
