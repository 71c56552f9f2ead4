//! CLI utility to render metric logs to SVG charts without the UI.

use std::path::PathBuf;

use metrics_visualiser::config::{self, AppSettings, DisplaySettings, ExportSettings};
use metrics_visualiser::dashboard::{self, MetricSelection, NoticeLevel, PlotMode, RenderRequest};
use metrics_visualiser::export;
use metrics_visualiser::logging;
use metrics_visualiser::metrics::{EpochOrder, SourceKind, read_metric_file};

fn main() {
    if let Err(err) = logging::init_stderr() {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    let settings = config::load_or_default().unwrap_or_else(|err| {
        tracing::warn!("Using default settings: {err}");
        AppSettings::default()
    });
    let size = export_size(&options, &settings.export);
    let (mode, epoch_order) = display_choices(&options, &settings.display);

    let mut buffers: Vec<(SourceKind, Vec<u8>)> = Vec::new();
    for (kind, path) in [
        (SourceKind::Training, &options.train),
        (SourceKind::Testing, &options.test),
    ] {
        if let Some(path) = path {
            let bytes = read_metric_file(path).map_err(|err| err.to_string())?;
            buffers.push((kind, bytes));
        }
    }

    let selection = if options.metrics.is_empty() {
        MetricSelection::All
    } else {
        MetricSelection::Only(options.metrics.clone())
    };
    let mut request = RenderRequest::new(mode)
        .with_selection(selection)
        .with_epoch_order(epoch_order);
    for (kind, bytes) in &buffers {
        request = request.with_source(*kind, bytes);
    }

    let dashboard = dashboard::render(&request);
    for failure in &dashboard.failures {
        eprintln!("Skipped {} input: {}", failure.source, failure.message);
    }
    if let Some(notice) = dashboard.notice() {
        return match notice.level {
            NoticeLevel::Info => {
                println!("{}", notice.text);
                Ok(())
            }
            NoticeLevel::Warning | NoticeLevel::Error => Err(notice.text.clone()),
        };
    }

    let written = export::export_charts(dashboard.charts(), &options.out_dir, size)
        .map_err(|err| err.to_string())?;
    for path in &written {
        println!("{}", path.display());
    }
    tracing::info!("Wrote {} chart(s) to {}", written.len(), options.out_dir.display());
    Ok(())
}

struct Options {
    train: Option<PathBuf>,
    test: Option<PathBuf>,
    mode: Option<PlotMode>,
    metrics: Vec<String>,
    out_dir: PathBuf,
    epoch_order: Option<EpochOrder>,
    width: Option<u32>,
    height: Option<u32>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            train: None,
            test: None,
            mode: None,
            metrics: Vec::new(),
            out_dir: PathBuf::from("."),
            epoch_order: None,
            width: None,
            height: None,
        }
    }
}

fn export_size(options: &Options, defaults: &ExportSettings) -> (u32, u32) {
    let settings = AppSettings {
        export: ExportSettings {
            width: options.width.unwrap_or(defaults.width),
            height: options.height.unwrap_or(defaults.height),
        },
        ..AppSettings::default()
    };
    settings.normalized().export.size()
}

/// Flags win; otherwise the configured display choices apply.
fn display_choices(options: &Options, defaults: &DisplaySettings) -> (PlotMode, EpochOrder) {
    (
        options.mode.unwrap_or(defaults.default_mode),
        options.epoch_order.unwrap_or(defaults.epoch_order),
    )
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--train" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--train requires a value".to_string())?;
                options.train = Some(PathBuf::from(value));
            }
            "--test" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--test requires a value".to_string())?;
                options.test = Some(PathBuf::from(value));
            }
            "--mode" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--mode requires a value".to_string())?;
                options.mode = Some(PlotMode::from_name(value).ok_or_else(|| {
                    format!("Unknown mode: {value} (expected combined or individual)")
                })?);
            }
            "--metric" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--metric requires a value".to_string())?;
                options.metrics.push(value.to_string());
            }
            "--out" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--out requires a value".to_string())?;
                options.out_dir = PathBuf::from(value);
            }
            "--input-order" => {
                options.epoch_order = Some(EpochOrder::Input);
            }
            "--numeric-order" => {
                options.epoch_order = Some(EpochOrder::Numeric);
            }
            "--width" => {
                idx += 1;
                options.width = Some(parse_pixels(args.get(idx), "--width")?);
            }
            "--height" => {
                idx += 1;
                options.height = Some(parse_pixels(args.get(idx), "--height")?);
            }
            unknown => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }
    Ok(Some(options))
}

fn parse_pixels(value: Option<&String>, flag: &str) -> Result<u32, String> {
    let value = value.ok_or_else(|| format!("{flag} requires a value"))?;
    value
        .parse::<u32>()
        .map_err(|_| format!("{flag} expects a pixel count, got {value}"))
}

fn help_text() -> String {
    [
        "metrics-visualiser-export",
        "",
        "Renders training/testing metric logs to SVG line charts.",
        "",
        "Usage:",
        "  metrics-visualiser-export --train <file.json> [--test <file.json>] [options]",
        "",
        "Options:",
        "  --train <path>     Training metrics JSON.",
        "  --test <path>      Testing metrics JSON.",
        "  --mode <mode>      combined or individual (defaults to the configured mode).",
        "  --metric <name>    Metric to plot (repeatable; defaults to all).",
        "  --out <dir>        Output folder (defaults to the current folder).",
        "  --input-order      Keep epochs in file order instead of sorting numerically.",
        "  --numeric-order    Sort epochs numerically even if config says otherwise.",
        "  --width <px>       SVG width (defaults to the configured export width).",
        "  --height <px>      SVG height (defaults to the configured export height).",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_full_argument_list() {
        let options = parse_args(args(&[
            "--train", "train.json", "--test", "test.json", "--mode", "individual", "--metric",
            "loss", "--metric", "acc", "--out", "charts", "--input-order", "--width", "800",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(options.train, Some(PathBuf::from("train.json")));
        assert_eq!(options.test, Some(PathBuf::from("test.json")));
        assert_eq!(options.mode, Some(PlotMode::Individual));
        assert_eq!(options.metrics, ["loss", "acc"]);
        assert_eq!(options.out_dir, PathBuf::from("charts"));
        assert_eq!(options.epoch_order, Some(EpochOrder::Input));
        assert_eq!(options.width, Some(800));
        assert_eq!(options.height, None);
    }

    #[test]
    fn rejects_unknown_mode_and_flags() {
        assert!(parse_args(args(&["--mode", "stacked"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
        assert!(parse_args(args(&["--width", "wide"])).is_err());
        assert!(parse_args(args(&["--train"])).is_err());
    }

    #[test]
    fn configured_display_choices_apply_without_flags() {
        let configured = DisplaySettings {
            default_mode: PlotMode::Individual,
            epoch_order: EpochOrder::Input,
        };
        let options = parse_args(args(&["--train", "train.json"])).unwrap().unwrap();
        assert_eq!(
            display_choices(&options, &configured),
            (PlotMode::Individual, EpochOrder::Input)
        );
        let options = parse_args(args(&["--mode", "combined", "--numeric-order"]))
            .unwrap()
            .unwrap();
        assert_eq!(
            display_choices(&options, &configured),
            (PlotMode::Combined, EpochOrder::Numeric)
        );
    }

    #[test]
    fn export_size_clamps_overrides() {
        let options = Options {
            width: Some(10),
            ..Options::default()
        };
        assert_eq!(export_size(&options, &ExportSettings::default()), (320, 720));
    }
}
