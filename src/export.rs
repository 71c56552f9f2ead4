//! SVG rendering of chart descriptions with plotters.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::chart::{ChartBounds, ChartSpec, LineDash};

/// Default export canvas size in pixels.
pub const DEFAULT_EXPORT_SIZE: (u32, u32) = (1280, 720);

const EMPTY_BOUNDS: ChartBounds = ChartBounds {
    x_min: 0.0,
    x_max: 1.0,
    y_min: 0.0,
    y_max: 1.0,
};

/// Errors that may occur while exporting charts.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to draw chart {title:?}: {message}")]
    Draw { title: String, message: String },
    #[error("Failed to create export directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

type SvgArea<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type DrawResult = Result<(), DrawingAreaErrorKind<std::io::Error>>;

/// Render one chart to an SVG document.
pub fn render_svg(chart: &ChartSpec, size: (u32, u32)) -> Result<String, ExportError> {
    let bounds = chart.bounds().unwrap_or(EMPTY_BOUNDS);
    let draw_error = |err: DrawingAreaErrorKind<std::io::Error>| ExportError::Draw {
        title: chart.title.clone(),
        message: err.to_string(),
    };
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_chart(&root, chart, bounds).map_err(draw_error)?;
        root.present().map_err(draw_error)?;
    }
    Ok(svg)
}

/// Render one chart and write it to `path`.
pub fn write_svg(chart: &ChartSpec, path: &Path, size: (u32, u32)) -> Result<(), ExportError> {
    let svg = render_svg(chart, size)?;
    std::fs::write(path, svg).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write every chart into `dir`, returning the files created in chart order.
pub fn export_charts(
    charts: &[ChartSpec],
    dir: &Path,
    size: (u32, u32),
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut written = Vec::with_capacity(charts.len());
    for (index, chart) in charts.iter().enumerate() {
        let path = dir.join(chart_file_name(index, &chart.title));
        write_svg(chart, &path, size)?;
        tracing::info!("Exported chart {:?} to {}", chart.title, path.display());
        written.push(path);
    }
    Ok(written)
}

/// File name for the `index`-th chart, derived from its title.
pub fn chart_file_name(index: usize, title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    let slug = if slug.is_empty() { "chart" } else { slug };
    format!("{:02}_{slug}.svg", index + 1)
}

fn draw_chart(root: &SvgArea<'_>, chart: &ChartSpec, bounds: ChartBounds) -> DrawResult {
    root.fill(&WHITE)?;
    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 28))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(bounds.x_min..bounds.x_max, bounds.y_min..bounds.y_max)?;

    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    for series in &chart.series {
        let (r, g, b) = series.rgb();
        let style = RGBColor(r, g, b).stroke_width(2);
        let mut segments = series.segments();
        if segments.is_empty() {
            segments.push(&[]);
        }
        for (run_index, run) in segments.into_iter().enumerate() {
            let points: Vec<(f64, f64)> = run
                .iter()
                .map(|point| (point.epoch as f64, point.value))
                .collect();
            if let [single] = points.as_slice() {
                ctx.draw_series(std::iter::once(Circle::new(*single, 3, style.filled())))?;
            }
            let anno = match series.dash {
                LineDash::Solid => ctx.draw_series(LineSeries::new(points, style))?,
                LineDash::Dashed => ctx.draw_series(DashedLineSeries::new(points, 8, 5, style))?,
            };
            if run_index == 0 {
                anno.label(series.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], style));
            }
        }
    }

    if !chart.series.is_empty() {
        ctx.configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK.mix(0.3))
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }
    Ok(())
}
