use handlecheck::{
    analyze,
    host::{draw, HostView, Tool},
    Layer, Settings,
};
use kurbo::BezPath;
use libtest_mimic::{Arguments, Failed, Trial};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How many of each kind of finding a case should produce.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
struct Counts {
    angled_handles: usize,
    zero_handles: usize,
    non_straight_lines: usize,
    crossings: usize,
    duplicate_segments: usize,
}

#[derive(Serialize, Deserialize, Debug)]
struct RegressionCaseDeclaration {
    svg_path: String,
    settings: Option<Settings>,
    expect: Counts,
    /// The number of foreground and background markers, if we care.
    markers: Option<(usize, usize)>,
}

fn main() {
    let args = Arguments::from_args();
    let tests = regression_tests();

    libtest_mimic::run(&args, tests).exit();
}

fn regression_tests() -> Vec<Trial> {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let file_paths = glob::glob(&format!("{ws}/tests/regression/**/*.yml")).unwrap();

    file_paths
        .into_iter()
        .map(|p| {
            let p = p.unwrap();
            let name = input_path_base(&p).display().to_string();
            Trial::test(name, || run_regression_test(p))
        })
        .collect()
}

fn input_path_base(input_path: &Path) -> &Path {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let base = format!("{ws}/tests/regression");
    input_path.strip_prefix(base).unwrap()
}

fn run_regression_test(path: PathBuf) -> Result<(), Failed> {
    let input = std::fs::read_to_string(&path)?;
    let case: RegressionCaseDeclaration = serde_yaml::from_str(&input)?;
    let bez = BezPath::from_svg(&case.svg_path)?;
    let layer = Layer::from_bez_path(&bez)?;
    let settings = case.settings.unwrap_or_default();

    let findings = analyze(&layer, &settings);
    let actual = Counts {
        angled_handles: findings.angled_handles.len(),
        zero_handles: findings.zero_handles.len(),
        non_straight_lines: findings.non_straight_lines.len(),
        crossings: findings.crossings.len(),
        duplicate_segments: findings.duplicate_segments.len(),
    };
    if actual != case.expect {
        return Err(format!("expected {:?}, found {:?}", case.expect, actual).into());
    }

    if let Some((foreground, background)) = case.markers {
        let view = HostView {
            tool: Tool::Select,
            scale: Some(1.0),
            handle_size_index: Some(1),
        };
        let markers = draw(&layer, &settings, &view).ok_or("no markers drawn")?;
        let actual = (markers.foreground.len(), markers.background.len());
        if actual != (foreground, background) {
            return Err(format!(
                "expected {:?} markers, found {:?}",
                (foreground, background),
                actual
            )
            .into());
        }
    }

    Ok(())
}
