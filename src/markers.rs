//! Turning findings into things to draw.
//!
//! We don't render anything ourselves. Instead, [`build_markers`] produces a
//! list of filled discs and stroked paths in glyph coordinates, split into
//! the ones that go on top of the outline and the ones that go underneath.
//! Sizes are divided by the view scale, so that markers stay roughly the
//! same size on screen as the user zooms.

use kurbo::BezPath;
use serde::Serialize;

use crate::{
    geom::Point,
    outline::{Layer, NodeRef},
    Findings, FindingKind, Plane,
};

/// A color with alpha, each channel between 0 and 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Opacity.
    pub a: f64,
}

impl Color {
    /// Creates a color from its components.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Color { r, g, b, a }
    }

    /// The same color with a different opacity.
    pub const fn with_alpha(self, a: f64) -> Self {
        Color { a, ..self }
    }
}

/// Translucent red, for angled handles.
pub const ANGLED_HANDLE: Color = Color::rgba(1.0, 0.1, 0.1, 0.6);
/// Translucent purple, for zero handles.
pub const ZERO_HANDLE: Color = Color::rgba(0.7, 0.1, 0.9, 0.7);
/// Orange, for non-straight lines. The opacity varies per line.
pub const NON_STRAIGHT_LINE: Color = Color::rgba(1.0, 0.5, 0.0, 1.0);
/// Yellow.
pub const YELLOW: Color = Color::rgba(1.0, 1.0, 0.0, 1.0);
/// Orange.
pub const ORANGE: Color = Color::rgba(1.0, 0.5, 0.0, 1.0);
/// Purple.
pub const PURPLE: Color = Color::rgba(0.5, 0.0, 0.5, 1.0);

/// The opacity of crossing markers whose intersection sits on a control point.
pub const SMOOTH_CROSSING_ALPHA: f64 = 0.4;

/// Half the width (and height) of the cross marking a crossing, in screen units.
pub const CROSS_HALF_SIZE: f64 = 10.0;

/// The user's preferred size for node handles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum HandleSize {
    /// The smallest size.
    Small,
    /// The default size.
    #[default]
    Regular,
    /// The largest size.
    Large,
}

impl HandleSize {
    /// Looks up a handle size by its index in the host's preferences.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(HandleSize::Small),
            1 => Some(HandleSize::Regular),
            2 => Some(HandleSize::Large),
            _ => None,
        }
    }

    /// The on-screen diameter of a handle of this size.
    pub fn base_diameter(self) -> f64 {
        match self {
            HandleSize::Small => 5.0,
            HandleSize::Regular => 8.0,
            HandleSize::Large => 12.0,
        }
    }
}

/// How the host is currently displaying the layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ViewStyle {
    /// The zoom factor: screen units per glyph unit. Must be positive.
    pub scale: f64,
    /// The user's preferred handle size.
    pub handle_size: HandleSize,
}

impl Default for ViewStyle {
    fn default() -> Self {
        ViewStyle {
            scale: 1.0,
            handle_size: HandleSize::Regular,
        }
    }
}

impl ViewStyle {
    /// The diameter of the disc marking an angled handle at `node`.
    ///
    /// This shrinks more slowly than the scale grows, so that markers get
    /// a little bigger on screen when zooming in.
    pub fn handle_diameter(&self, node: &crate::Node) -> f64 {
        let mut diameter = self.handle_size.base_diameter() * self.scale.powf(-0.9);
        if node.is_off_curve() {
            diameter *= 0.8;
        }
        if node.selected {
            diameter *= 1.45;
        }
        diameter
    }

    /// Converts a length in screen units to glyph units.
    pub fn unzoomed(&self, len: f64) -> f64 {
        len / self.scale
    }
}

/// How the ends of a stroke are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LineCap {
    /// Square ends, flush with the endpoints.
    Butt,
    /// Semicircular ends.
    Round,
}

/// A dash pattern, in glyph units.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dash {
    /// Alternating lengths of dashes and gaps.
    pub pattern: Vec<f64>,
    /// How far into the pattern the stroke starts.
    pub phase: f64,
}

/// Something to draw, in glyph coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Shape {
    /// A filled circle.
    Disc {
        /// The center of the circle.
        center: Point,
        /// The diameter of the circle.
        diameter: f64,
        /// The fill color.
        color: Color,
    },
    /// A stroked path.
    Stroke {
        /// The path to stroke.
        path: BezPath,
        /// The stroke color.
        color: Color,
        /// The stroke width.
        width: f64,
        /// How the ends of the stroke are drawn.
        cap: LineCap,
        /// The dash pattern, or `None` for a solid stroke.
        dash: Option<Dash>,
    },
}

/// A shape, tagged by the kind of finding it marks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    /// What this marker is marking.
    pub kind: FindingKind,
    /// What to draw.
    pub shape: Shape,
}

/// All the markers for one layer, in drawing order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Markers {
    /// Markers to draw on top of the outline.
    pub foreground: Vec<Marker>,
    /// Markers to draw underneath the outline.
    pub background: Vec<Marker>,
}

impl Markers {
    /// The total number of markers.
    pub fn len(&self) -> usize {
        self.foreground.len() + self.background.len()
    }

    /// Are there no markers at all?
    pub fn is_empty(&self) -> bool {
        self.foreground.is_empty() && self.background.is_empty()
    }

    fn push(&mut self, kind: FindingKind, shape: Shape) {
        let marker = Marker { kind, shape };
        match kind.plane() {
            Plane::Foreground => self.foreground.push(marker),
            Plane::Background => self.background.push(marker),
        }
    }
}

fn line(from: Point, to: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(from.to_kurbo());
    path.line_to(to.to_kurbo());
    path
}

fn solid(path: BezPath, color: Color, width: f64, cap: LineCap) -> Shape {
    Shape::Stroke {
        path,
        color,
        width,
        cap,
        dash: None,
    }
}

/// Builds the markers for everything in `findings`.
///
/// `findings` must have come from analyzing `layer`. Foreground markers are
/// angled handles followed by duplicate segments; background markers are
/// non-straight lines, then crossings, then zero handles.
pub fn build_markers(layer: &Layer, findings: &Findings, style: &ViewStyle) -> Markers {
    let mut markers = Markers::default();
    let base = style.handle_size.base_diameter();

    for &node_ref in &findings.angled_handles {
        let node = layer.node(node_ref);
        markers.push(
            FindingKind::AngledHandle,
            Shape::Disc {
                center: node.point,
                diameter: style.handle_diameter(node),
                color: ANGLED_HANDLE,
            },
        );
    }

    // Every segment gets a purple dashed stroke, with a yellow one on top.
    // All the purple goes first, so that the yellow dashes are never covered.
    let passes = [
        (PURPLE, 3.0, [7.0, 3.0], 3.5),
        (YELLOW, 2.0, [4.0, 6.0], 2.0),
    ];
    for (color, width, pattern, phase) in passes {
        for dup in &findings.duplicate_segments {
            markers.push(
                FindingKind::DuplicateSegment,
                Shape::Stroke {
                    path: dup.segment.to_bez_path(),
                    color,
                    width: style.unzoomed(width),
                    cap: LineCap::Round,
                    dash: Some(Dash {
                        pattern: pattern.iter().map(|&len| style.unzoomed(len)).collect(),
                        phase: style.unzoomed(phase),
                    }),
                },
            );
        }
    }

    for &(path_idx, non_straight) in &findings.non_straight_lines {
        let from = layer.node(NodeRef {
            path: path_idx,
            node: non_straight.from,
        });
        let to = layer.node(NodeRef {
            path: path_idx,
            node: non_straight.to,
        });
        markers.push(
            FindingKind::NonStraightLine,
            solid(
                line(from.point, to.point),
                NON_STRAIGHT_LINE.with_alpha(non_straight.opacity),
                style.unzoomed(base),
                LineCap::Butt,
            ),
        );
    }

    for (_, crossing) in &findings.crossings {
        let (arm_color, cross_color) = if crossing.smooth {
            (
                YELLOW.with_alpha(SMOOTH_CROSSING_ALPHA),
                ORANGE.with_alpha(SMOOTH_CROSSING_ALPHA),
            )
        } else {
            (YELLOW, ORANGE)
        };
        let width = style.unzoomed(1.0);
        for arm in [crossing.arm_a, crossing.arm_b] {
            markers.push(
                FindingKind::Crossing,
                solid(line(crossing.point, arm), arm_color, width, LineCap::Butt),
            );
        }

        let Point { x, y } = crossing.point;
        let d = style.unzoomed(CROSS_HALF_SIZE);
        let mut cross = line(Point::new(x - d, y + d), Point::new(x + d, y - d));
        cross.move_to((x - d, y - d));
        cross.line_to((x + d, y + d));
        markers.push(
            FindingKind::Crossing,
            solid(cross, cross_color, width, LineCap::Butt),
        );
    }

    for &node_ref in &findings.zero_handles {
        markers.push(
            FindingKind::ZeroHandle,
            Shape::Disc {
                center: layer.node(node_ref).point,
                diameter: style.unzoomed(2.0 * base),
                color: ZERO_HANDLE,
            },
        );
    }

    tracing::trace!(
        foreground = markers.foreground.len(),
        background = markers.background.len(),
        "built markers"
    );
    markers
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use kurbo::PathEl;

    use super::*;
    use crate::{analyze, Node, Path, PathIdx, Settings};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn kinds(markers: &[Marker]) -> Vec<FindingKind> {
        markers.iter().map(|m| m.kind).collect()
    }

    #[test]
    fn handle_sizes() {
        assert_eq!(HandleSize::from_index(0), Some(HandleSize::Small));
        assert_eq!(HandleSize::from_index(2), Some(HandleSize::Large));
        assert_eq!(HandleSize::from_index(3), None);
        assert_eq!(HandleSize::from_index(-1), None);
        assert_eq!(HandleSize::default().base_diameter(), 8.0);

        let style = ViewStyle {
            scale: 1.0,
            handle_size: HandleSize::Large,
        };
        assert!(close(style.handle_diameter(&Node::on_curve(0.0, 0.0)), 12.0));
        assert!(close(style.handle_diameter(&Node::off_curve(0.0, 0.0)), 9.6));
        assert!(close(
            style.handle_diameter(&Node::off_curve(0.0, 0.0).selected()),
            9.6 * 1.45
        ));

        let zoomed = ViewStyle {
            scale: 2.0,
            ..style
        };
        assert!(close(
            zoomed.handle_diameter(&Node::on_curve(0.0, 0.0)),
            12.0 * 2.0f64.powf(-0.9)
        ));
    }

    #[test]
    fn angled_and_zero_handles() {
        let layer = Layer::new([Path::closed([
            Node::on_curve(0.0, 0.0),
            Node::off_curve(5.0, 3.0).selected(),
            Node::off_curve(100.0, 100.0),
            Node::on_curve(100.0, 100.0),
        ])]);
        let style = ViewStyle {
            scale: 0.5,
            handle_size: HandleSize::Small,
        };
        let markers = build_markers(&layer, &analyze(&layer, &Settings::default()), &style);

        assert_eq!(kinds(&markers.foreground), vec![FindingKind::AngledHandle]);
        assert_matches!(
            markers.foreground[0].shape,
            Shape::Disc { center, diameter, color } => {
                assert_eq!(center, Point::new(5.0, 3.0));
                assert!(close(diameter, 5.0 * 0.5f64.powf(-0.9) * 0.8 * 1.45));
                assert_eq!(color, ANGLED_HANDLE);
            }
        );

        assert_eq!(kinds(&markers.background), vec![FindingKind::ZeroHandle]);
        assert_matches!(
            markers.background[0].shape,
            Shape::Disc { center, diameter, color } => {
                assert_eq!(center, Point::new(100.0, 100.0));
                assert!(close(diameter, 20.0));
                assert_eq!(color, ZERO_HANDLE);
            }
        );
    }

    #[test]
    fn non_straight_line() {
        let layer = Layer::new([Path::open([
            Node::on_curve(0.0, 0.0),
            Node::on_curve(100.0, 10.0),
        ])]);
        let style = ViewStyle {
            scale: 2.0,
            handle_size: HandleSize::Regular,
        };
        let markers = build_markers(&layer, &analyze(&layer, &Settings::default()), &style);
        assert!(markers.foreground.is_empty());
        assert_eq!(markers.len(), 1);
        assert_matches!(
            &markers.background[0].shape,
            Shape::Stroke { path, color, width, cap: LineCap::Butt, dash: None } => {
                assert_eq!(path.elements().len(), 2);
                assert!(close(color.a, 0.3));
                assert!(close(*width, 4.0));
            }
        );
    }

    #[test]
    fn crossing() {
        let layer = Layer::new([Path::open([
            Node::on_curve(0.0, 0.0),
            Node::off_curve(0.0, 55.0),
            Node::off_curve(-10.0, 100.0),
            Node::on_curve(100.0, 100.0),
        ])]);
        let settings = Settings {
            almost_straight_lines: false,
            ..Settings::default()
        };
        let style = ViewStyle {
            scale: 2.0,
            ..ViewStyle::default()
        };
        let findings = analyze(&layer, &settings);
        assert_eq!(findings.crossings.len(), 1);
        let markers = build_markers(&layer, &findings, &style);

        assert_eq!(kinds(&markers.background), vec![FindingKind::Crossing; 3]);
        assert_matches!(
            &markers.background[1].shape,
            Shape::Stroke { path, color, width, .. } => {
                assert_eq!(*color, YELLOW);
                assert!(close(*width, 0.5));
                assert_matches!(path.elements()[1], PathEl::LineTo(p) => {
                    assert_eq!(p, kurbo::Point::new(0.0, 0.0));
                });
            }
        );
        assert_matches!(
            &markers.background[2].shape,
            Shape::Stroke { path, color, .. } => {
                assert_eq!(*color, ORANGE);
                assert_eq!(path.elements().len(), 4);
                let bbox = kurbo::Shape::bounding_box(path);
                assert!(close(bbox.width(), 10.0));
                assert!(close(bbox.height(), 10.0));
            }
        );
    }

    #[test]
    fn smooth_crossings_are_softer() {
        let layer = Layer::new([Path::open([
            Node::on_curve(0.0, 0.0),
            Node::off_curve(0.0, 55.0),
            Node::off_curve(0.0, 100.0),
            Node::on_curve(100.0, 100.0),
        ])]);
        let findings = analyze(&layer, &Settings::default());
        let markers = build_markers(&layer, &findings, &ViewStyle::default());
        assert!(markers.background.iter().all(|m| matches!(
            m.shape,
            Shape::Stroke { color, .. } if color.a == SMOOTH_CROSSING_ALPHA
        )));
    }

    #[test]
    fn duplicates_draw_purple_then_yellow() {
        let a = Path::open([Node::on_curve(0.0, 0.0), Node::on_curve(10.0, 0.0)]);
        let b = Path::open([Node::on_curve(10.0, 0.0), Node::on_curve(0.0, 0.0)]);
        let layer = Layer::new([a, b]);
        let findings = analyze(&layer, &Settings::default());
        assert_eq!(findings.duplicate_segments[1].path, PathIdx(1));

        let style = ViewStyle {
            scale: 2.0,
            ..ViewStyle::default()
        };
        let markers = build_markers(&layer, &findings, &style);
        assert!(markers.background.is_empty());
        let colors: Vec<_> = markers
            .foreground
            .iter()
            .map(|m| match &m.shape {
                Shape::Stroke { color, .. } => *color,
                Shape::Disc { color, .. } => *color,
            })
            .collect();
        assert_eq!(colors, vec![PURPLE, PURPLE, YELLOW, YELLOW]);

        assert_matches!(
            &markers.foreground[0].shape,
            Shape::Stroke { width, cap: LineCap::Round, dash: Some(dash), .. } => {
                assert!(close(*width, 1.5));
                assert_eq!(dash.pattern, vec![3.5, 1.5]);
                assert!(close(dash.phase, 1.75));
            }
        );
        assert_matches!(
            &markers.foreground[3].shape,
            Shape::Stroke { width, dash: Some(dash), .. } => {
                assert!(close(*width, 1.0));
                assert_eq!(dash.pattern, vec![2.0, 3.0]);
                assert!(close(dash.phase, 1.0));
            }
        );
    }

    #[test]
    fn serializes_to_json() {
        let layer = Layer::new([Path::open([
            Node::on_curve(0.0, 0.0),
            Node::on_curve(100.0, 10.0),
        ])]);
        let markers = build_markers(
            &layer,
            &analyze(&layer, &Settings::default()),
            &ViewStyle::default(),
        );
        let json = serde_json::to_value(&markers).unwrap();
        assert_eq!(json["background"][0]["kind"], "NonStraightLine");
        assert_eq!(json["background"][0]["shape"]["Stroke"]["cap"], "Butt");
    }
}
