//! A read-only snapshot of a glyph outline: layers own paths, and paths own
//! nodes.
//!
//! Nodes refer to their neighbors by index rather than by pointer. A path is
//! the only owner of its nodes, so "previous" and "next" are just modular
//! arithmetic on a [`NodeIdx`].

use kurbo::{BezPath, PathEl};

use crate::{geom::Segment, Error, Point};

/// An index into the nodes of a [`Path`].
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct NodeIdx(pub usize);

/// An index into the paths of a [`Layer`].
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct PathIdx(pub usize);

/// A vector of nodes, indexed by [`NodeIdx`].
#[derive(Clone, PartialEq)]
pub struct NodeVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(NodeVec, NodeIdx, "n");

/// A vector of paths, indexed by [`PathIdx`].
#[derive(Clone, PartialEq)]
pub struct PathVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(PathVec, PathIdx, "p");

/// Whether a node lies on the outline or steers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    /// A point that the outline passes through.
    OnCurve,
    /// A Bézier control point (a "handle" or "BCP").
    OffCurve,
}

/// A point in a path, with its role in the outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    /// Where the node is.
    pub point: Point,
    /// Whether the node is on the outline or a control point.
    pub kind: NodeKind,
    /// Is the node part of the editor's current selection?
    pub selected: bool,
    /// Does the outline pass smoothly through this node? Only meaningful for
    /// on-curve nodes.
    pub smooth: bool,
}

impl Node {
    /// An unselected, non-smooth on-curve node.
    pub fn on_curve(x: f64, y: f64) -> Self {
        Node {
            point: Point::new(x, y),
            kind: NodeKind::OnCurve,
            selected: false,
            smooth: false,
        }
    }

    /// An unselected off-curve node.
    pub fn off_curve(x: f64, y: f64) -> Self {
        Node {
            point: Point::new(x, y),
            kind: NodeKind::OffCurve,
            selected: false,
            smooth: false,
        }
    }

    /// The same node, but selected.
    pub fn selected(self) -> Self {
        Node {
            selected: true,
            ..self
        }
    }

    /// The same node, but smooth.
    pub fn smooth(self) -> Self {
        Node {
            smooth: true,
            ..self
        }
    }

    /// Is this an on-curve node?
    pub fn is_on_curve(&self) -> bool {
        self.kind == NodeKind::OnCurve
    }

    /// Is this an off-curve node?
    pub fn is_off_curve(&self) -> bool {
        self.kind == NodeKind::OffCurve
    }
}

/// A sequence of nodes forming one contour.
///
/// In a closed path, the first node follows the last one. In an open path,
/// the first node has no predecessor and the last one has no successor, so
/// the implicit line closing an open contour is never analyzed. (Glyphs'
/// "Show Angled Handles" reporter does wrap around in open paths, and flags
/// that closing line.)
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    nodes: NodeVec<Node>,
    closed: bool,
}

impl Path {
    /// Creates a path from its nodes.
    pub fn new(nodes: impl IntoIterator<Item = Node>, closed: bool) -> Self {
        Path {
            nodes: nodes.into_iter().collect(),
            closed,
        }
    }

    /// Creates a closed path.
    pub fn closed(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self::new(nodes, true)
    }

    /// Creates an open path.
    pub fn open(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self::new(nodes, false)
    }

    /// Is this path closed?
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The number of nodes in this path.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// All the nodes, indexed by [`NodeIdx`].
    pub fn nodes(&self) -> &NodeVec<Node> {
        &self.nodes
    }

    /// Iterate over all indices that can be used to index into this path.
    pub fn indices(&self) -> impl Iterator<Item = NodeIdx> {
        self.nodes.indices()
    }

    /// The node before `idx`, if there is one.
    ///
    /// A one-node closed path is its own predecessor.
    pub fn prev(&self, idx: NodeIdx) -> Option<NodeIdx> {
        let n = self.len();
        if idx.0 >= n {
            None
        } else if idx.0 > 0 {
            Some(NodeIdx(idx.0 - 1))
        } else if self.closed {
            Some(NodeIdx(n - 1))
        } else {
            None
        }
    }

    /// The node after `idx`, if there is one.
    ///
    /// A one-node closed path is its own successor.
    pub fn next(&self, idx: NodeIdx) -> Option<NodeIdx> {
        let n = self.len();
        if idx.0 + 1 < n {
            Some(NodeIdx(idx.0 + 1))
        } else if idx.0 + 1 == n && self.closed {
            Some(NodeIdx(0))
        } else {
            None
        }
    }

    /// The on-curve node that the off-curve node at `idx` is attached to.
    ///
    /// We prefer the previous node, and fall back to the next one. Returns
    /// `None` if `idx` is on-curve, or if neither neighbor is on-curve (which
    /// happens in the middle of a run of quadratic control points, or in
    /// malformed input).
    pub fn anchor(&self, idx: NodeIdx) -> Option<NodeIdx> {
        if !self.nodes.get(idx)?.is_off_curve() {
            return None;
        }
        let on_curve = |i: NodeIdx| self.nodes[i].is_on_curve();
        self.prev(idx)
            .filter(|&i| on_curve(i))
            .or_else(|| self.next(idx).filter(|&i| on_curve(i)))
    }

    /// If the on-curve node at `idx` ends a cubic segment, returns the indices
    /// of that segment read backwards from `idx`: the end point, its control
    /// point, the other control point, and the start point.
    pub fn cubic_ending_at(&self, idx: NodeIdx) -> Option<[NodeIdx; 4]> {
        let kind = |i: NodeIdx| self.nodes[i].kind;
        if kind(idx) != NodeKind::OnCurve {
            return None;
        }
        let b = self.prev(idx).filter(|&i| kind(i) == NodeKind::OffCurve)?;
        let c = self.prev(b).filter(|&i| kind(i) == NodeKind::OffCurve)?;
        let d = self.prev(c).filter(|&i| kind(i) == NodeKind::OnCurve)?;
        Some([idx, b, c, d])
    }

    /// The segment ending at the on-curve node `idx`, in outline order.
    ///
    /// Returns `None` for off-curve nodes, for the first node of an open path,
    /// and for on-curve nodes preceded by anything other than a line or a
    /// cubic (like a quadratic run of control points).
    pub fn segment_ending_at(&self, idx: NodeIdx) -> Option<Segment> {
        let node = self.nodes.get(idx)?;
        if !node.is_on_curve() {
            return None;
        }
        let prev = self.prev(idx).filter(|&p| p != idx)?;
        if self.nodes[prev].is_on_curve() {
            return Some(Segment::line(self.nodes[prev].point, node.point));
        }
        let [a, b, c, d] = self.cubic_ending_at(idx)?;
        let pt = |i: NodeIdx| self.nodes[i].point;
        Some(Segment::cubic(pt(d), pt(c), pt(b), pt(a)))
    }

    /// All the segments of this path, each with the index of the node it ends
    /// at.
    pub fn segments(&self) -> impl Iterator<Item = (NodeIdx, Segment)> + '_ {
        self.indices()
            .filter_map(|idx| Some((idx, self.segment_ending_at(idx)?)))
    }
}

impl Path {
    /// Converts this path to a `kurbo` path, for rendering.
    ///
    /// The result starts at the first on-curve node. Stretches of nodes that
    /// don't form lines or cubics break the path into several subpaths.
    pub fn to_bez_path(&self) -> BezPath {
        let mut bez = BezPath::new();
        let Some(first) = self.indices().find(|&i| self[i].is_on_curve()) else {
            return bez;
        };
        bez.move_to(self[first].point.to_kurbo());

        let n = self.len();
        let end = if self.closed { first.0 + n } else { n - 1 };
        for i in first.0 + 1..=end {
            let idx = NodeIdx(i % n);
            if !self[idx].is_on_curve() {
                continue;
            }
            match self.segment_ending_at(idx) {
                Some(seg) if seg.is_line() => bez.line_to(seg.end().to_kurbo()),
                Some(seg) => {
                    let pts = seg.points();
                    bez.curve_to(pts[1].to_kurbo(), pts[2].to_kurbo(), pts[3].to_kurbo());
                }
                None => bez.move_to(self[idx].point.to_kurbo()),
            }
        }
        if self.closed {
            bez.close_path();
        }
        bez
    }
}

impl std::ops::Index<NodeIdx> for Path {
    type Output = Node;

    fn index(&self, index: NodeIdx) -> &Self::Output {
        &self.nodes[index]
    }
}

/// A reference to one node of a [`Layer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct NodeRef {
    /// The path containing the node.
    pub path: PathIdx,
    /// The node within its path.
    pub node: NodeIdx,
}

/// One glyph's outline in one master: the unit of analysis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layer {
    paths: PathVec<Path>,
}

impl Layer {
    /// Creates a layer from its paths.
    pub fn new(paths: impl IntoIterator<Item = Path>) -> Self {
        Layer {
            paths: paths.into_iter().collect(),
        }
    }

    /// All the paths, indexed by [`PathIdx`].
    pub fn paths(&self) -> &PathVec<Path> {
        &self.paths
    }

    /// Looks up a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` doesn't refer to a node in this layer.
    pub fn node(&self, node: NodeRef) -> &Node {
        &self.paths[node.path][node.node]
    }

    /// Builds a layer out of a `kurbo` path.
    ///
    /// Each subpath becomes a [`Path`]. Closed subpaths whose last on-curve
    /// point coincides with the start lose that repeated point, so that the
    /// segment closing the contour ends at the first node (the way font
    /// editors store contours).
    ///
    /// Quadratic segments aren't supported, and all coordinates must be finite.
    pub fn from_bez_path(bez: &BezPath) -> Result<Self, Error> {
        let mut paths = Vec::new();
        let mut current: Vec<Node> = Vec::new();
        let mut start: Option<Point> = None;

        let check = |p: kurbo::Point| -> Result<Point, Error> {
            if p.x.is_nan() || p.y.is_nan() {
                Err(Error::NaN)
            } else if p.x.is_infinite() || p.y.is_infinite() {
                Err(Error::Infinity)
            } else {
                Ok(p.into())
            }
        };

        for el in bez.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    if !current.is_empty() {
                        paths.push(Path::open(std::mem::take(&mut current)));
                    }
                    let p = check(p)?;
                    start = Some(p);
                    current.push(Node::on_curve(p.x, p.y));
                }
                PathEl::LineTo(p) => {
                    begin_implicit_subpath(&mut current, start);
                    let p = check(p)?;
                    current.push(Node::on_curve(p.x, p.y));
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    begin_implicit_subpath(&mut current, start);
                    let (p1, p2, p3) = (check(p1)?, check(p2)?, check(p3)?);
                    current.push(Node::off_curve(p1.x, p1.y));
                    current.push(Node::off_curve(p2.x, p2.y));
                    current.push(Node::on_curve(p3.x, p3.y));
                }
                PathEl::QuadTo(..) => return Err(Error::QuadraticSegment),
                PathEl::ClosePath => {
                    if current.len() > 1 {
                        if let (Some(first), Some(last)) = (current.first(), current.last()) {
                            if last.is_on_curve() && last.point == first.point {
                                current.pop();
                            }
                        }
                    }
                    if !current.is_empty() {
                        paths.push(Path::closed(std::mem::take(&mut current)));
                    }
                }
            }
        }
        if !current.is_empty() {
            paths.push(Path::open(current));
        }

        tracing::trace!(paths = paths.len(), "built layer from bezier path");
        Ok(Layer::new(paths))
    }
}

// Drawing commands after a `ClosePath` implicitly start from the last
// `MoveTo` point.
fn begin_implicit_subpath(current: &mut Vec<Node>, start: Option<Point>) {
    if current.is_empty() {
        if let Some(p) = start {
            current.push(Node::on_curve(p.x, p.y));
        }
    }
}
