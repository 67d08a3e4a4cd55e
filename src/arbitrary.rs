//! Utilities for fuzz and/or property testing using `arbitrary`.
//!
//! Uniformly random outlines almost never have the properties we look for
//! (a handle that is exactly vertical, a segment that is exactly duplicated),
//! so the generators here are biased towards a small integer grid and
//! towards re-using coordinates that they've already produced.

use arbitrary::Unstructured;

use crate::{
    analyze, geom,
    markers::{build_markers, ViewStyle},
    Layer, Node, NodeKind, Path, Point, Settings,
};

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

/// Generate a coordinate, usually on a small integer grid.
fn coordinate(u: &mut Unstructured<'_>) -> Result<f64, arbitrary::Error> {
    if u.ratio(3, 4)? {
        Ok(f64::from(u.int_in_range(-20i32..=20)? * 10))
    } else {
        float_in_range(-1e4, 1e4, u)
    }
}

/// Generate a coordinate with a good chance of being equal, or very close,
/// to `orig`.
fn another_coordinate(orig: f64, u: &mut Unstructured<'_>) -> Result<f64, arbitrary::Error> {
    match u.int_in_range(0u8..=3)? {
        0 => Ok(orig),
        1 => Ok(orig + float_in_range(-3.0, 3.0, u)?),
        _ => coordinate(u),
    }
}

/// Generate a point.
pub fn point(u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(coordinate(u)?, coordinate(u)?))
}

/// Generate a point that is likely to be lined up with `near`, horizontally
/// or vertically (or both).
pub fn point_near(near: Point, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(
        another_coordinate(near.x, u)?,
        another_coordinate(near.y, u)?,
    ))
}

fn node(point: Point, kind: NodeKind, u: &mut Unstructured<'_>) -> Result<Node, arbitrary::Error> {
    Ok(Node {
        point,
        kind,
        selected: u.ratio(1, 8)?,
        smooth: kind == NodeKind::OnCurve && u.ratio(1, 4)?,
    })
}

/// Generate a path.
///
/// Most paths are made of lines and cubics, with handles that like to line
/// up with their anchors. Occasionally, the node kinds are scrambled to make
/// a malformed outline.
pub fn path(u: &mut Unstructured<'_>) -> Result<Path, arbitrary::Error> {
    let closed: bool = u.arbitrary()?;
    let segments = u.int_in_range(0usize..=8)?;

    let mut current = point(u)?;
    let mut nodes = vec![node(current, NodeKind::OnCurve, u)?];
    for _ in 0..segments {
        let end = point_near(current, u)?;
        if u.arbitrary()? {
            let c1 = point_near(current, u)?;
            let c2 = point_near(end, u)?;
            nodes.push(node(c1, NodeKind::OffCurve, u)?);
            nodes.push(node(c2, NodeKind::OffCurve, u)?);
        }
        nodes.push(node(end, NodeKind::OnCurve, u)?);
        current = end;
    }

    if u.ratio(1, 16)? {
        for n in &mut nodes {
            if u.arbitrary()? {
                n.kind = NodeKind::OffCurve;
            }
        }
    }
    Ok(Path::new(nodes, closed))
}

/// Generate a layer.
///
/// Some of the paths are copies (possibly reversed) of earlier ones, so that
/// there's something for the duplicate detector to find.
pub fn layer(u: &mut Unstructured<'_>) -> Result<Layer, arbitrary::Error> {
    let count = u.int_in_range(0usize..=4)?;
    let mut paths: Vec<Path> = Vec::with_capacity(count);
    for _ in 0..count {
        let copy = !paths.is_empty() && u.ratio(1, 4)?;
        let next = if copy {
            let idx = u.choose_index(paths.len())?;
            let orig = &paths[idx];
            let mut nodes: Vec<Node> = orig.nodes().values().copied().collect();
            if u.arbitrary()? {
                nodes.reverse();
            }
            Path::new(nodes, orig.is_closed())
        } else {
            path(u)?
        };
        paths.push(next);
    }
    Ok(Layer::new(paths))
}

/// Generate settings, with every toggle random.
pub fn settings(u: &mut Unstructured<'_>) -> Result<Settings, arbitrary::Error> {
    Ok(Settings {
        zero_handles: u.arbitrary()?,
        almost_straight_lines: u.arbitrary()?,
        laser_beams: u.arbitrary()?,
        duplicate_paths: u.arbitrary()?,
        only_show_close_to_straight_handles: u.arbitrary()?,
        ..Settings::default()
    })
}

/// Property checks driven by arbitrary data, shared by the unit tests and
/// the fuzz targets.
pub mod arbtests {
    use super::*;

    /// Analyzing and drawing an arbitrary layer doesn't panic, produces the
    /// same result twice, and only refers to nodes that exist.
    pub fn analyze_layer(u: &mut Unstructured<'_>) -> Result<(), arbitrary::Error> {
        let layer = layer(u)?;
        let settings = settings(u)?;
        let findings = analyze(&layer, &settings);
        assert_eq!(findings, analyze(&layer, &settings));

        for node_ref in findings.angled_handles.iter().chain(&findings.zero_handles) {
            assert!(layer.node(*node_ref).is_off_curve());
        }
        for (path, crossing) in &findings.crossings {
            assert!(layer.paths()[*path].cubic_ending_at(crossing.end).is_some());
        }
        for dup in &findings.duplicate_segments {
            let mut others = findings
                .duplicate_segments
                .iter()
                .filter(|other| (other.path, other.end) != (dup.path, dup.end));
            assert!(others.any(|o| o.segment.same_as(&dup.segment)));
        }

        let style = ViewStyle {
            scale: float_in_range(0.01, 100.0, u)?,
            ..ViewStyle::default()
        };
        let markers = build_markers(&layer, &findings, &style);
        assert!(markers.len() >= findings.len());
        Ok(())
    }

    /// Intersecting two lines doesn't depend on which one comes first, or
    /// on which way they point.
    pub fn intersect_symmetric(u: &mut Unstructured<'_>) -> Result<(), arbitrary::Error> {
        let a = point(u)?;
        let b = point_near(a, u)?;
        let c = point(u)?;
        let d = point_near(c, u)?;

        let forward = geom::intersect(a, b, c, d);
        assert_eq!(forward, geom::intersect(c, d, a, b));
        assert_eq!(forward, geom::intersect(b, a, d, c));
        if let Some(p) = forward {
            assert!(p.is_finite());
        }
        Ok(())
    }
}
