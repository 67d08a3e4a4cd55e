//! Utilities for generating examples, benchmarks, and test cases.

use crate::{Layer, Node, Path};

/// An elliptical contour made of four cubics, centered at `(cx, cy)`.
///
/// If `wobble` is non-zero, the handles at the top and bottom get pushed
/// sideways by that much, so they're no longer horizontal.
fn bowl(cx: f64, cy: f64, rx: f64, ry: f64, wobble: f64) -> Path {
    // The usual magic number for approximating a circle with cubics.
    let k = 0.5523;
    Path::closed([
        Node::on_curve(cx, cy - ry),
        Node::off_curve(cx + k * rx, cy - ry + wobble),
        Node::off_curve(cx + rx, cy - k * ry),
        Node::on_curve(cx + rx, cy).smooth(),
        Node::off_curve(cx + rx, cy + k * ry),
        Node::off_curve(cx + k * rx, cy + ry - wobble),
        Node::on_curve(cx, cy + ry).smooth(),
        Node::off_curve(cx - k * rx, cy + ry),
        Node::off_curve(cx - rx, cy + k * ry),
        Node::on_curve(cx - rx, cy).smooth(),
        Node::off_curve(cx - rx, cy - k * ry),
        Node::off_curve(cx - k * rx, cy - ry),
    ])
}

/// A rectangle with its top-left corner at `(x, y)`.
///
/// If `slant` is non-zero, generates a parallelogram instead: the right-hand
/// side gets translated down by `slant`.
fn stem(x: f64, y: f64, width: f64, height: f64, slant: f64) -> Path {
    Path::closed([
        Node::on_curve(x, y),
        Node::on_curve(x, y + height),
        Node::on_curve(x + width, y + height + slant),
        Node::on_curve(x + width, y + slant),
    ])
}

/// Generate an `n` by `n` grid of "b"-like shapes, all in one layer.
///
/// Each shape has a bowl made of cubics and a stem made of lines. Every
/// other bowl has slightly angled handles, every third stem is slightly
/// slanted, and every fifth bowl is drawn twice, so that every analyzer has
/// something to do.
pub fn glyph_grid(n: usize) -> Layer {
    let mut paths = Vec::new();
    for i in 0..n {
        let x = i as f64 * 600.0;
        for j in 0..n {
            let y = j as f64 * 800.0;
            let cell = i * n + j;

            let wobble = if cell % 2 == 0 { 0.0 } else { 3.0 };
            let slant = if cell % 3 == 0 { 1.5 } else { 0.0 };
            paths.push(stem(x, y, 80.0, 700.0, slant));
            paths.push(bowl(x + 280.0, y + 250.0, 200.0, 250.0, wobble));
            if cell % 5 == 0 {
                paths.push(bowl(x + 280.0, y + 250.0, 200.0, 250.0, wobble));
            }
        }
    }
    Layer::new(paths)
}
