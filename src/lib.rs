#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
pub mod crossings;
pub mod duplicates;
mod geom;
pub mod handles;
pub mod host;
pub mod markers;
mod num;
mod outline;
pub mod settings;

#[cfg(feature = "generators")]
pub mod generators;

pub use geom::{angle_degrees, bounding_rect_contains, intersect, subtract, Point, Segment};
pub use outline::{Layer, Node, NodeIdx, NodeKind, NodeRef, NodeVec, Path, PathIdx, PathVec};
pub use settings::{Settings, Toggle};

use crossings::Crossing;
use duplicates::DuplicateSegment;
use handles::{HandleFilter, NonStraightLine};

/// Something went wrong while building or (de)serializing inputs.
///
/// The analyzers themselves never fail: degenerate geometry just produces no
/// findings.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// At least one of the inputs was infinite.
    #[error("one of the inputs was infinite")]
    Infinity,
    /// At least one of the inputs was not a number.
    #[error("one of the inputs had a NaN")]
    NaN,
    /// The input had a quadratic segment, which we don't analyze.
    #[error("quadratic segments are not supported")]
    QuadraticSegment,
    /// Settings couldn't be read or written as JSON.
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Whether a marker belongs in front of the outline or behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Plane {
    /// Drawn on top of the outline.
    Foreground,
    /// Drawn underneath the outline.
    Background,
}

/// The different kinds of things we look for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum FindingKind {
    /// A handle that isn't horizontal or vertical.
    AngledHandle,
    /// A handle retracted into its on-curve node.
    ZeroHandle,
    /// A line that is almost, but not quite, horizontal or vertical.
    NonStraightLine,
    /// Crossed handles in a cubic segment.
    Crossing,
    /// A segment with an identical copy elsewhere in the layer.
    DuplicateSegment,
}

impl FindingKind {
    /// Where markers for this kind of finding get drawn.
    pub fn plane(self) -> Plane {
        match self {
            FindingKind::AngledHandle | FindingKind::DuplicateSegment => Plane::Foreground,
            FindingKind::ZeroHandle | FindingKind::NonStraightLine | FindingKind::Crossing => {
                Plane::Background
            }
        }
    }
}

/// One noteworthy thing about a layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Finding {
    /// A handle that isn't horizontal or vertical.
    AngledHandle(NodeRef),
    /// A handle retracted into its on-curve node.
    ZeroHandle(NodeRef),
    /// A line that is almost, but not quite, horizontal or vertical.
    NonStraightLine(PathIdx, NonStraightLine),
    /// Crossed handles in a cubic segment.
    Crossing(PathIdx, Crossing),
    /// A segment with an identical copy elsewhere in the layer.
    DuplicateSegment(DuplicateSegment),
}

impl Finding {
    /// What kind of finding this is.
    pub fn kind(&self) -> FindingKind {
        match self {
            Finding::AngledHandle(_) => FindingKind::AngledHandle,
            Finding::ZeroHandle(_) => FindingKind::ZeroHandle,
            Finding::NonStraightLine(..) => FindingKind::NonStraightLine,
            Finding::Crossing(..) => FindingKind::Crossing,
            Finding::DuplicateSegment(_) => FindingKind::DuplicateSegment,
        }
    }
}

/// Everything one analysis pass found in a layer, grouped by kind.
///
/// Within each group, findings are in outline order (by path, then by node).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Findings {
    /// Handles that aren't horizontal or vertical.
    pub angled_handles: Vec<NodeRef>,
    /// Handles retracted into their on-curve node.
    pub zero_handles: Vec<NodeRef>,
    /// Lines that are almost, but not quite, horizontal or vertical.
    pub non_straight_lines: Vec<(PathIdx, NonStraightLine)>,
    /// Crossed handles.
    pub crossings: Vec<(PathIdx, Crossing)>,
    /// Segments with identical copies.
    pub duplicate_segments: Vec<DuplicateSegment>,
}

impl Findings {
    /// The total number of findings.
    pub fn len(&self) -> usize {
        self.angled_handles.len()
            + self.zero_handles.len()
            + self.non_straight_lines.len()
            + self.crossings.len()
            + self.duplicate_segments.len()
    }

    /// Did we find nothing at all?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all findings, one kind after the other.
    pub fn iter(&self) -> impl Iterator<Item = Finding> + '_ {
        let angled = self.angled_handles.iter().copied().map(Finding::AngledHandle);
        let zero = self.zero_handles.iter().copied().map(Finding::ZeroHandle);
        let lines = self
            .non_straight_lines
            .iter()
            .map(|&(path, line)| Finding::NonStraightLine(path, line));
        let crossings = self
            .crossings
            .iter()
            .map(|&(path, crossing)| Finding::Crossing(path, crossing));
        let dups = self
            .duplicate_segments
            .iter()
            .cloned()
            .map(Finding::DuplicateSegment);
        angled.chain(zero).chain(lines).chain(crossings).chain(dups)
    }
}

/// Runs every analyzer enabled in `settings` over `layer`.
///
/// Angled handles are always reported (subject to the "almost straight"
/// filter); everything else can be turned off.
pub fn analyze(layer: &Layer, settings: &Settings) -> Findings {
    let filter = if settings.only_show_close_to_straight_handles {
        HandleFilter::NearlyStraight
    } else {
        HandleFilter::All
    };

    let mut findings = Findings {
        angled_handles: handles::angled_handles_in(layer, filter),
        ..Findings::default()
    };
    if settings.zero_handles {
        findings.zero_handles = handles::zero_handles_in(layer);
    }
    if settings.almost_straight_lines {
        findings.non_straight_lines = handles::non_straight_lines_in(layer);
    }
    if settings.laser_beams {
        findings.crossings = crossings::crossings_in(layer);
    }
    if settings.duplicate_paths {
        findings.duplicate_segments = duplicates::find_duplicate_segments(layer);
    }

    tracing::debug!(
        paths = layer.paths().len(),
        angled_handles = findings.angled_handles.len(),
        zero_handles = findings.zero_handles.len(),
        non_straight_lines = findings.non_straight_lines.len(),
        crossings = findings.crossings.len(),
        duplicate_segments = findings.duplicate_segments.len(),
        "analyzed layer"
    );
    findings
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use kurbo::BezPath;

    use super::*;

    // Contains at least one of everything.
    fn messy_layer() -> Layer {
        let svg = "M0 0 L100 1 C110 150 60 105 50 100 C50 100 0 60 0 0 Z \
                   M200 0 L300 0 L300 100 Z \
                   M300 0 L200 0 L250 -100 Z";
        Layer::from_bez_path(&BezPath::from_svg(svg).unwrap()).unwrap()
    }

    #[test]
    fn finds_everything() {
        let findings = analyze(&messy_layer(), &Settings::default());
        assert_eq!(findings.angled_handles.len(), 2);
        assert_eq!(findings.zero_handles.len(), 1);
        assert_eq!(findings.non_straight_lines.len(), 1);
        assert_eq!(findings.crossings.len(), 1);
        assert_eq!(findings.duplicate_segments.len(), 2);
        assert_eq!(findings.len(), 7);
        assert_eq!(findings.iter().count(), 7);

        insta::assert_debug_snapshot!(findings.angled_handles, @r"
        [
            NodeRef {
                path: p_0,
                node: n_2,
            },
            NodeRef {
                path: p_0,
                node: n_3,
            },
        ]
        ");
    }

    #[test]
    fn iteration_order_and_kinds() {
        let findings = analyze(&messy_layer(), &Settings::default());
        let kinds: Vec<_> = findings.iter().map(|f| f.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                FindingKind::AngledHandle,
                FindingKind::AngledHandle,
                FindingKind::ZeroHandle,
                FindingKind::NonStraightLine,
                FindingKind::Crossing,
                FindingKind::DuplicateSegment,
                FindingKind::DuplicateSegment,
            ]
        );
        assert_matches!(
            findings.iter().nth(2),
            Some(Finding::ZeroHandle(NodeRef {
                path: PathIdx(0),
                node: NodeIdx(5)
            }))
        );
    }

    #[test]
    fn analysis_is_idempotent() {
        let layer = messy_layer();
        let settings = Settings::default();
        assert_eq!(analyze(&layer, &settings), analyze(&layer, &settings));
    }

    #[test]
    fn toggles_are_independent() {
        let layer = messy_layer();
        let all = analyze(&layer, &Settings::default());

        let mut settings = Settings::default();
        settings.toggle(Toggle::LaserBeams);
        let no_lasers = analyze(&layer, &settings);
        assert!(no_lasers.crossings.is_empty());
        assert_eq!(
            Findings {
                crossings: all.crossings.clone(),
                ..no_lasers
            },
            all
        );

        for toggle in [
            Toggle::ZeroHandles,
            Toggle::AlmostStraightLines,
            Toggle::DuplicatePaths,
        ] {
            let mut settings = Settings::default();
            settings.toggle(toggle);
            let findings = analyze(&layer, &settings);
            assert_eq!(findings.angled_handles, all.angled_handles);
            assert!(findings.len() < all.len(), "{toggle:?}");
        }
    }

    #[test]
    fn nearly_straight_only() {
        let mut settings = Settings::default();
        settings.toggle(Toggle::OnlyShowCloseToStraightHandles);
        let findings = analyze(&messy_layer(), &settings);
        // The handle at (110, 150) is about 4 degrees off vertical; the one
        // at (60, 105) is a deliberate diagonal.
        assert_eq!(findings.angled_handles.len(), 1);
    }

    #[test]
    fn planes() {
        assert_eq!(FindingKind::AngledHandle.plane(), Plane::Foreground);
        assert_eq!(FindingKind::DuplicateSegment.plane(), Plane::Foreground);
        assert_eq!(FindingKind::Crossing.plane(), Plane::Background);
        assert_eq!(FindingKind::ZeroHandle.plane(), Plane::Background);
        assert_eq!(FindingKind::NonStraightLine.plane(), Plane::Background);
    }
}
