use eframe::egui::{RichText, Ui};
use egui_plot::{Corner, Legend, Line, LineStyle, Plot, PlotPoints, Points};

use super::style;
use crate::chart::{ChartSeries, ChartSpec, LineDash};

const LINE_WIDTH: f32 = 2.0;
const DASH_LENGTH: f32 = 8.0;
const POINT_RADIUS: f32 = 3.0;

/// Plot one chart with axes, legend, hover readout and zoom/pan.
pub(super) fn render_chart(ui: &mut Ui, chart: &ChartSpec, height: f32) {
    let palette = style::palette();
    ui.horizontal(|ui| {
        ui.label(RichText::new(&chart.title).color(palette.text_primary).strong());
        ui.separator();
        ui.label(RichText::new(&chart.legend_title).color(palette.text_muted));
    });
    let mut plot = Plot::new("metrics_chart")
        .height(height)
        .allow_scroll(false)
        .legend(Legend::default().position(Corner::RightTop))
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .x_axis_formatter(|mark, _range| epoch_mark_label(mark.value));
    if let Some(bounds) = chart.bounds() {
        plot = plot
            .include_x(bounds.x_min)
            .include_x(bounds.x_max)
            .include_y(bounds.y_min)
            .include_y(bounds.y_max);
    }
    plot.show(ui, |plot_ui| {
        for series in &chart.series {
            let color = style::series_color(series.rgb());
            for run in plot_runs(series) {
                if let [single] = run.as_slice() {
                    plot_ui.points(
                        Points::new(series.label.as_str(), PlotPoints::from(vec![*single]))
                            .radius(POINT_RADIUS)
                            .color(color),
                    );
                    continue;
                }
                let mut line = Line::new(series.label.as_str(), PlotPoints::from(run))
                    .color(color)
                    .width(LINE_WIDTH);
                if series.dash == LineDash::Dashed {
                    line = line.style(LineStyle::Dashed {
                        length: DASH_LENGTH,
                    });
                }
                plot_ui.line(line);
            }
        }
    });
}

/// One list of plot coordinates per contiguous run of the series.
fn plot_runs(series: &ChartSeries) -> Vec<Vec<[f64; 2]>> {
    series
        .segments()
        .into_iter()
        .map(|run| {
            run.iter()
                .map(|point| [point.epoch as f64, point.value])
                .collect()
        })
        .collect()
}

/// Epoch axis labels only at whole epochs.
fn epoch_mark_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        String::new()
    }
}
