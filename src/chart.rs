//! Backend-neutral line chart descriptions.
//!
//! Charts are plain values: the egui view paints them and the SVG exporter
//! renders them with plotters. Neither renderer needs to know how the series
//! were derived from metric tables.

use serde_json::Value;
use thiserror::Error;

use crate::metrics::ingest::json_kind;
use crate::metrics::{LongRecord, MetricTable, SourceKind, TableError};

/// Title of the single chart drawn in combined mode.
pub const COMBINED_TITLE: &str = "Performance Metrics Over Epochs";
/// X axis label shared by every chart.
pub const EPOCH_LABEL: &str = "Epoch";
/// Y axis label of the combined chart.
pub const VALUE_LABEL: &str = "Metric Value";

/// Largest magnitude the value axis extends to.
const VALUE_LIMIT: f64 = 1e300;

/// Qualitative palette indexed by [`ChartSeries::color_slot`].
pub const SERIES_PALETTE: [(u8, u8, u8); 10] = [
    (99, 110, 250),
    (239, 85, 59),
    (0, 204, 150),
    (171, 99, 250),
    (255, 161, 90),
    (25, 211, 243),
    (255, 102, 146),
    (182, 232, 128),
    (255, 151, 255),
    (254, 203, 82),
];

/// Errors raised while turning tables into chart series.
#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("{slot} epoch {epoch}: metric {metric:?} is {found}, expected a number")]
    NonNumeric {
        metric: String,
        epoch: i64,
        slot: SourceKind,
        found: &'static str,
    },
    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDash {
    Solid,
    Dashed,
}

impl LineDash {
    /// Combined charts tell sources apart by dash style.
    pub fn for_source(source: SourceKind) -> Self {
        match source {
            SourceKind::Training => Self::Solid,
            SourceKind::Testing => Self::Dashed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub epoch: i64,
    pub value: f64,
}

/// One polyline of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub metric: String,
    pub source: SourceKind,
    pub color_slot: usize,
    pub dash: LineDash,
    pub points: Vec<ChartPoint>,
    /// Indices into `points` where a new run starts after a missing value.
    pub breaks: Vec<usize>,
}

impl ChartSeries {
    fn new(label: String, metric: &str, source: SourceKind, color_slot: usize, dash: LineDash) -> Self {
        Self {
            label,
            metric: metric.to_string(),
            source,
            color_slot,
            dash,
            points: Vec::new(),
            breaks: Vec::new(),
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        SERIES_PALETTE[self.color_slot % SERIES_PALETTE.len()]
    }

    /// Append the next epoch's value; `None` ends the current run.
    fn push(&mut self, epoch: i64, value: Option<f64>) {
        match value {
            Some(value) => self.points.push(ChartPoint { epoch, value }),
            None => {
                let at = self.points.len();
                if at > 0 && self.breaks.last() != Some(&at) {
                    self.breaks.push(at);
                }
            }
        }
    }

    /// Contiguous runs of points, split wherever a value was missing.
    pub fn segments(&self) -> Vec<&[ChartPoint]> {
        let mut segments = Vec::with_capacity(self.breaks.len() + 1);
        let mut start = 0;
        for &end in &self.breaks {
            segments.push(&self.points[start..end]);
            start = end;
        }
        if start < self.points.len() {
            segments.push(&self.points[start..]);
        }
        segments
    }
}

/// A complete line chart over epochs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
    pub series: Vec<ChartSeries>,
}

/// Padded data extents used to lay out axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ChartSpec {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|series| series.points.len()).sum()
    }

    /// Extents of all points with a small margin; `None` when nothing is plotted.
    ///
    /// Degenerate ranges (a single epoch or a flat metric) are widened so both
    /// axes always span a positive width. The value axis is clamped to
    /// `±VALUE_LIMIT` so its span stays finite for huge values.
    pub fn bounds(&self) -> Option<ChartBounds> {
        let mut points = self.series.iter().flat_map(|series| series.points.iter());
        let first = points.next()?;
        let mut bounds = ChartBounds {
            x_min: first.epoch as f64,
            x_max: first.epoch as f64,
            y_min: first.value,
            y_max: first.value,
        };
        for point in points {
            bounds.x_min = bounds.x_min.min(point.epoch as f64);
            bounds.x_max = bounds.x_max.max(point.epoch as f64);
            bounds.y_min = bounds.y_min.min(point.value);
            bounds.y_max = bounds.y_max.max(point.value);
        }
        if bounds.x_max - bounds.x_min < f64::EPSILON {
            let pad = (bounds.x_max.abs() * 1e-9).max(1.0);
            bounds.x_min -= pad;
            bounds.x_max += pad;
        }
        let half_span = bounds.y_max / 2.0 - bounds.y_min / 2.0;
        let pad = if half_span < f64::EPSILON {
            (bounds.y_max.abs() * 0.1).max(1.0)
        } else {
            half_span * 0.1
        };
        bounds.y_min = (bounds.y_min - pad).clamp(-VALUE_LIMIT, VALUE_LIMIT);
        bounds.y_max = (bounds.y_max + pad).clamp(-VALUE_LIMIT, VALUE_LIMIT);
        if bounds.y_max - bounds.y_min < f64::EPSILON {
            let pad = (bounds.y_max.abs() * 0.1).max(1.0);
            bounds.y_min = bounds.y_max - pad;
        }
        Some(bounds)
    }
}

/// Build the combined chart: color encodes metric, dash encodes source.
pub fn combined_chart(long: &[LongRecord]) -> Result<ChartSpec, ChartError> {
    let mut metric_order: Vec<&str> = Vec::new();
    let mut series: Vec<ChartSeries> = Vec::new();
    for row in long {
        let slot = match metric_order.iter().position(|metric| *metric == row.metric) {
            Some(slot) => slot,
            None => {
                metric_order.push(&row.metric);
                metric_order.len() - 1
            }
        };
        let index = match series
            .iter()
            .position(|s| s.metric == row.metric && s.source == row.source)
        {
            Some(index) => index,
            None => {
                series.push(ChartSeries::new(
                    format!("{}, {}", row.metric, row.source),
                    &row.metric,
                    row.source,
                    slot,
                    LineDash::for_source(row.source),
                ));
                series.len() - 1
            }
        };
        let value = numeric(row.value.as_ref(), &row.metric, row.epoch, row.source)?;
        series[index].push(row.epoch, value);
    }
    Ok(ChartSpec {
        title: COMBINED_TITLE.to_string(),
        x_label: EPOCH_LABEL.to_string(),
        y_label: VALUE_LABEL.to_string(),
        legend_title: "Metric".to_string(),
        series,
    })
}

/// Build one metric's chart: one series per source, colored by source.
pub fn individual_chart(table: &MetricTable, metric: &str) -> Result<ChartSpec, ChartError> {
    if !table.has_metric(metric) {
        return Err(TableError::UnknownMetric(metric.to_string()).into());
    }
    let mut series = Vec::new();
    for source in table.sources() {
        let mut line = ChartSeries::new(
            source.label().to_string(),
            metric,
            source,
            source.index(),
            LineDash::Solid,
        );
        for row in table.rows_for(source) {
            line.push(row.epoch, numeric(row.value(metric), metric, row.epoch, source)?);
        }
        series.push(line);
    }
    Ok(ChartSpec {
        title: format!("{metric} Over Epochs"),
        x_label: EPOCH_LABEL.to_string(),
        y_label: metric.to_string(),
        legend_title: "Type".to_string(),
        series,
    })
}

fn numeric(
    value: Option<&Value>,
    metric: &str,
    epoch: i64,
    source: SourceKind,
) -> Result<Option<f64>, ChartError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Ok(number.as_f64()),
        Some(other) => Err(ChartError::NonNumeric {
            metric: metric.to_string(),
            epoch,
            slot: source,
            found: json_kind(other),
        }),
    }
}
