use std::path::PathBuf;

use clap::{Args, Parser};
use kurbo::BezPath;
use tracing_subscriber::EnvFilter;

use handlecheck::{
    analyze,
    host::{draw, HostView, Tool},
    Finding, Layer, Settings, Toggle,
};

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum CliTool {
    Select,
    Draw,
    Text,
    Pan,
}

impl From<CliTool> for Tool {
    fn from(tool: CliTool) -> Tool {
        match tool {
            CliTool::Select => Tool::Select,
            CliTool::Draw => Tool::Draw,
            CliTool::Text => Tool::Text,
            CliTool::Pan => Tool::Pan,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
enum CliToggle {
    ZeroHandles,
    AlmostStraightLines,
    LaserBeams,
    DuplicatePaths,
    OnlyShowCloseToStraightHandles,
}

impl From<CliToggle> for Toggle {
    fn from(toggle: CliToggle) -> Toggle {
        match toggle {
            CliToggle::ZeroHandles => Toggle::ZeroHandles,
            CliToggle::AlmostStraightLines => Toggle::AlmostStraightLines,
            CliToggle::LaserBeams => Toggle::LaserBeams,
            CliToggle::DuplicatePaths => Toggle::DuplicatePaths,
            CliToggle::OnlyShowCloseToStraightHandles => Toggle::OnlyShowCloseToStraightHandles,
        }
    }
}

/// Prints diagnostic markers for an outline given as SVG path data.
#[derive(Parser)]
struct Cli {
    #[command(flatten)]
    input: Input,

    /// A JSON file with settings, using the preference names as keys.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Flip these settings (after loading the settings file, if any).
    #[arg(long, value_enum)]
    toggle: Vec<CliToggle>,

    /// The zoom factor.
    #[arg(long)]
    scale: Option<f64>,

    /// The handle size index (0, 1 or 2).
    #[arg(long)]
    handle_size: Option<i64>,

    /// The active tool.
    #[arg(long, value_enum, default_value = "select")]
    tool: CliTool,

    /// Print the findings instead of the markers.
    #[arg(long)]
    findings: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// A file containing SVG path data.
    input: Option<PathBuf>,

    /// SVG path data.
    #[arg(long)]
    svg: Option<String>,
}

fn read_layer(input: &Input) -> anyhow::Result<Layer> {
    let data = match (&input.input, &input.svg) {
        (Some(path), None) => std::fs::read_to_string(path)?,
        (None, Some(svg)) => svg.clone(),
        _ => anyhow::bail!("exactly one of the input file or --svg is required"),
    };
    let bez = BezPath::from_svg(data.trim())?;
    Ok(Layer::from_bez_path(&bez)?)
}

fn describe(finding: &Finding) -> serde_json::Value {
    let value = match finding {
        Finding::AngledHandle(node) | Finding::ZeroHandle(node) => serde_json::to_value(node),
        Finding::NonStraightLine(path, line) => Ok(serde_json::json!({
            "path": path.0,
            "from": line.from.0,
            "to": line.to.0,
            "opacity": line.opacity,
        })),
        Finding::Crossing(path, crossing) => Ok(serde_json::json!({
            "path": path.0,
            "crossing": crossing,
        })),
        Finding::DuplicateSegment(dup) => serde_json::to_value(dup),
    };
    serde_json::json!({
        "kind": finding.kind(),
        "at": value.unwrap_or(serde_json::Value::Null),
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let layer = read_layer(&args.input)?;

    let mut settings = match &args.settings {
        Some(path) => Settings::from_json(&std::fs::read_to_string(path)?)?,
        None => Settings::default(),
    };
    for &toggle in &args.toggle {
        settings.toggle(toggle.into());
    }

    if args.findings {
        let findings = analyze(&layer, &settings);
        let described: Vec<_> = findings.iter().map(|f| describe(&f)).collect();
        println!("{}", serde_json::to_string_pretty(&described)?);
        return Ok(());
    }

    let view = HostView {
        tool: args.tool.into(),
        scale: args.scale,
        handle_size_index: args.handle_size,
    };
    match draw(&layer, &settings, &view) {
        Some(markers) => println!("{}", serde_json::to_string_pretty(&markers)?),
        None => eprintln!("markers are hidden while the {:?} tool is active", args.tool),
    }
    Ok(())
}
