#![no_main]

use arbitrary::Arbitrary;
use handlecheck::{analyze, Layer, Settings};
use kurbo::BezPath;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum El {
    MoveTo(i16, i16),
    LineTo(i16, i16),
    CurveTo(i16, i16, i16, i16, i16, i16),
    Close,
}

// Arbitrary path elements, in whatever order. Small integer coordinates make
// exact coincidences (and so duplicates and zero handles) likely.
fuzz_target!(|els: Vec<El>| {
    let p = |x: i16, y: i16| (f64::from(x), f64::from(y));
    // kurbo wants every path to start with a `MoveTo`.
    let mut bez = BezPath::new();
    bez.move_to((0.0, 0.0));
    for el in els {
        match el {
            El::MoveTo(x, y) => bez.move_to(p(x, y)),
            El::LineTo(x, y) => bez.line_to(p(x, y)),
            El::CurveTo(x1, y1, x2, y2, x3, y3) => bez.curve_to(p(x1, y1), p(x2, y2), p(x3, y3)),
            El::Close => {
                bez.close_path();
                bez.move_to((0.0, 0.0));
            }
        }
    }
    if let Ok(layer) = Layer::from_bez_path(&bez) {
        let findings = analyze(&layer, &Settings::default());
        assert_eq!(findings, analyze(&layer, &Settings::default()));
        for path in layer.paths().values() {
            let _ = path.to_bez_path();
        }
    }
});
