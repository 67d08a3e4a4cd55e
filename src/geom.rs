//! Geometric primitives, like points and segments, and the line math the
//! analyzers share.

use arrayvec::ArrayVec;
use kurbo::BezPath;

use crate::num::CheapOrderedFloat;

/// A two-dimensional point, in font units.
///
/// Points are sorted by `y` and then by `x`. The order has no geometric
/// meaning; it just gives us a canonical way to key segments by their
/// endpoints.
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    ///
    /// Font coordinates have larger values up, but nothing here depends on it.
    pub y: f64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            CheapOrderedFloat::from(self.y),
            CheapOrderedFloat::from(self.x),
        )
            .cmp(&(
                CheapOrderedFloat::from(other.y),
                CheapOrderedFloat::from(other.x),
            ))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Are both coordinates finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Convert to a `kurbo` point, for drawing.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// Returns `b - a`, the vector pointing from `a` to `b`.
pub fn subtract(a: Point, b: Point) -> Point {
    Point::new(b.x - a.x, b.y - a.y)
}

/// The angle, in degrees, of the vector pointing from `p` to `q`.
///
/// Zero degrees points in the positive `x` direction, and the result is in
/// the half-open interval `(-180, 180]`.
pub fn angle_degrees(p: Point, q: Point) -> f64 {
    let v = subtract(p, q);
    let angle = v.y.atan2(v.x).to_degrees();
    // atan2 returns -pi for (-x, -0.0).
    if angle <= -180.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Intersects the infinite line through `a` and `b` with the infinite line
/// through `c` and `d`.
///
/// Returns `None` if the lines are parallel (including the case where one of
/// them is degenerate because its two points coincide), or if the
/// intersection isn't representable as a finite point.
///
/// This uses the determinant form, so vertical lines need no special handling.
pub fn intersect(a: Point, b: Point, c: Point, d: Point) -> Option<Point> {
    let denom = (d.y - c.y) * (b.x - a.x) - (b.y - a.y) * (d.x - c.x);
    if denom == 0.0 {
        return None;
    }

    let ab = b.x * a.y - a.x * b.y;
    let cd = d.x * c.y - c.x * d.y;
    let x = ((d.x - c.x) * ab - (b.x - a.x) * cd) / denom;
    let y = ((a.y - b.y) * cd - (c.y - d.y) * ab) / denom;

    let p = Point::new(x, y);
    p.is_finite().then_some(p)
}

/// Does the closed, axis-aligned rectangle with corners `p` and `q` contain
/// `point`?
///
/// The rectangle includes its boundary, so a degenerate rectangle (where `p`
/// and `q` share a coordinate) still contains the points on its segment.
pub fn bounding_rect_contains(p: Point, q: Point, point: Point) -> bool {
    let (min_x, max_x) = (p.x.min(q.x), p.x.max(q.x));
    let (min_y, max_y) = (p.y.min(q.y), p.y.max(q.y));
    (min_x..=max_x).contains(&point.x) && (min_y..=max_y).contains(&point.y)
}

/// A piece of an outline: either a straight line (two points) or a cubic
/// Bézier (four points: start, two controls, end).
///
/// Points are stored in outline order. Equality is exact and
/// orientation-sensitive; use [`Segment::same_as`] to also match reversed
/// segments.
#[derive(Clone, PartialEq, Eq, serde::Serialize)]
pub struct Segment {
    points: ArrayVec<Point, 4>,
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for p in &self.points {
            if !first {
                write!(f, " -- ")?;
            }
            write!(f, "{p:?}")?;
            first = false;
        }
        Ok(())
    }
}

impl Segment {
    /// A straight line from `start` to `end`.
    pub fn line(start: Point, end: Point) -> Self {
        Self {
            points: [start, end].into_iter().collect(),
        }
    }

    /// A cubic Bézier from `p0` to `p3`, with control points `p1` and `p2`.
    pub fn cubic(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self {
            points: ArrayVec::from([p0, p1, p2, p3]),
        }
    }

    /// All the points of this segment, in outline order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Is this a straight line?
    pub fn is_line(&self) -> bool {
        self.points.len() == 2
    }

    /// The on-curve point this segment starts at.
    pub fn start(&self) -> Point {
        self.points[0]
    }

    /// The on-curve point this segment ends at.
    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Are all the points finite?
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Point::is_finite)
    }

    /// The same segment, traversed in the other direction.
    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
        }
    }

    /// Does this segment cover exactly the same points as `other`, in either
    /// direction?
    pub fn same_as(&self, other: &Segment) -> bool {
        self.points.len() == other.points.len()
            && (self.points == other.points
                || self.points.iter().eq(other.points.iter().rev()))
    }

    /// The endpoints, in sorted order, so that a segment and its reversal
    /// produce the same key.
    pub(crate) fn endpoint_key(&self) -> (Point, Point) {
        let (s, e) = (self.start(), self.end());
        if s <= e {
            (s, e)
        } else {
            (e, s)
        }
    }

    /// Converts this segment to a one-segment `kurbo` path, for drawing.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start().to_kurbo());
        match self.points.as_slice() {
            [_, p1, p2, p3] => path.curve_to(p1.to_kurbo(), p2.to_kurbo(), p3.to_kurbo()),
            _ => path.line_to(self.end().to_kurbo()),
        }
        path
    }
}
