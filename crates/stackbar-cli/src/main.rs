use serde::Serialize;
use stackbar::render::{BarIconLayout, ClusterOptions};
use stackbar::{BarLayerTool, BarLayerToolConfig, JsonRecords, LayerItem};
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Stackbar(stackbar::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Stackbar(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Yaml(err) => write!(f, "YAML error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<stackbar::Error> for CliError {
    fn from(value: stackbar::Error) -> Self {
        Self::Stackbar(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Aggregate,
    Layout,
    Popup,
    Config,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    data: Option<String>,
    config: Option<String>,
    zoom: f64,
    max_cluster_radius: Option<f64>,
    pretty: bool,
}

#[derive(Serialize)]
struct LayoutOut {
    kind: &'static str,
    lat: f64,
    lng: f64,
    members: Vec<usize>,
    layout: BarIconLayout,
}

#[derive(Serialize)]
struct PopupOut {
    kind: &'static str,
    lat: f64,
    lng: f64,
    html: String,
}

fn usage() -> &'static str {
    "stackbar-cli\n\
\n\
USAGE:\n\
  stackbar-cli [aggregate] [--data <records>] [--config <path>] [--pretty]\n\
  stackbar-cli layout [--data <records>] [--config <path>] [--zoom <n>] [--max-cluster-radius <px>] [--pretty]\n\
  stackbar-cli popup [--data <records>] [--config <path>] [--zoom <n>] [--max-cluster-radius <px>] [--pretty]\n\
  stackbar-cli config [--config <path>] [--pretty]\n\
\n\
NOTES:\n\
  - <records> is a JSON array of objects, given with --data or as the last argument;\n\
    if omitted or '-', it is read from stdin.\n\
  - --config accepts a JSON or YAML (.yaml/.yml) tool config.\n\
  - --zoom defaults to 5; markers within the cluster radius (65px) are merged.\n\
  - Set STACKBAR_LOG (e.g. STACKBAR_LOG=debug) to log to stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        zoom: 5.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "aggregate" => args.command = Command::Aggregate,
            "layout" => args.command = Command::Layout,
            "popup" => args.command = Command::Popup,
            "config" => args.command = Command::Config,
            "--pretty" => args.pretty = true,
            "--data" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if args.data.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.data = Some(path.clone());
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--zoom" => {
                let Some(zoom) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.zoom = zoom.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.zoom.is_finite() && args.zoom >= 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--max-cluster-radius" => {
                let Some(radius) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let radius = radius.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(radius.is_finite() && radius >= 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.max_cluster_radius = Some(radius);
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.data.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.data = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn read_config(path: Option<&str>) -> Result<BarLayerToolConfig, CliError> {
    let Some(path) = path else {
        return Ok(BarLayerToolConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    let is_yaml = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        Ok(serde_yaml::from_str(&text)?)
    } else {
        Ok(serde_json::from_str(&text)?)
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn item_kind(item: &LayerItem<'_>) -> &'static str {
    match item {
        LayerItem::Marker { .. } => "marker",
        LayerItem::Cluster(_) => "cluster",
    }
}

fn item_members(item: &LayerItem<'_>) -> Vec<usize> {
    match item {
        LayerItem::Marker { index, .. } => vec![*index],
        LayerItem::Cluster(cluster) => cluster.members.clone(),
    }
}

fn load_tool(args: &Args, config: &BarLayerToolConfig) -> Result<BarLayerTool<JsonRecords>, CliError> {
    let records = JsonRecords::from_json_str(&read_input(args.data.as_deref())?)?;
    let mut cluster_options = ClusterOptions::default();
    if let Some(radius) = args.max_cluster_radius {
        cluster_options.max_cluster_radius = radius;
    }
    Ok(BarLayerTool::from_config(records, config).with_cluster_options(cluster_options))
}

fn run(args: Args) -> Result<(), CliError> {
    tracing::debug!(command = ?args.command, zoom = args.zoom, "stackbar-cli");
    let config = read_config(args.config.as_deref())?;

    match args.command {
        Command::Config => {
            let settings = stackbar::BarLayerSettings::from_config(&config);
            write_json(&settings.serialize(), args.pretty)
        }
        Command::Aggregate => {
            let tool = load_tool(&args, &config)?;
            write_json(&tool.state().work_data(), args.pretty)
        }
        Command::Layout => {
            let tool = load_tool(&args, &config)?;
            let out: Vec<LayoutOut> = tool
                .layer_items(args.zoom)
                .iter()
                .map(|item| {
                    let (lat, lng) = item.lat_lng();
                    LayoutOut {
                        kind: item_kind(item),
                        lat,
                        lng,
                        members: item_members(item),
                        layout: item.icon_layout(args.zoom),
                    }
                })
                .collect();
            write_json(&out, args.pretty)
        }
        Command::Popup => {
            let tool = load_tool(&args, &config)?;
            let out: Vec<PopupOut> = tool
                .layer_items(args.zoom)
                .iter()
                .map(|item| {
                    let (lat, lng) = item.lat_lng();
                    PopupOut {
                        kind: item_kind(item),
                        lat,
                        lng,
                        html: item.popup().to_html(),
                    }
                })
                .collect();
            write_json(&out, args.pretty)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("STACKBAR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
