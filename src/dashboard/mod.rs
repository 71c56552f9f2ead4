//! The render pipeline behind every dashboard view.
//!
//! [`render`] is a pure function of a [`RenderRequest`]: it parses the raw
//! inputs, reshapes them, resolves the metric selection and returns either
//! chart descriptions or a notice. Front ends call it whenever an input
//! changes and only draw what comes back.

use thiserror::Error;

use crate::chart::{ChartError, ChartSpec, combined_chart, individual_chart};
use crate::metrics::{
    EpochOrder, IngestError, MetricTable, SourceKind, TableError, melt, parse_metric_log,
};

mod request;

pub use request::{MetricSelection, PlotMode, RenderRequest};

/// Shown when no input has been provided.
pub const NO_INPUT_NOTICE: &str = "Please upload at least one JSON file to proceed.";
/// Shown when inputs loaded but no metric is selected.
pub const EMPTY_SELECTION_NOTICE: &str = "Please select at least one metric to plot.";

/// Why one input could not be turned into a table.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// An input that was provided but excluded from the union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: SourceKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A status message shown instead of charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Charts(Vec<ChartSpec>),
    Notice(Notice),
}

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Selectable metrics discovered in the loaded inputs.
    pub metrics: Vec<String>,
    /// Inputs that were provided but failed to load.
    pub failures: Vec<SourceFailure>,
    pub view: DashboardView,
}

impl Dashboard {
    pub fn charts(&self) -> &[ChartSpec] {
        match &self.view {
            DashboardView::Charts(charts) => charts,
            DashboardView::Notice(_) => &[],
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match &self.view {
            DashboardView::Notice(notice) => Some(notice),
            DashboardView::Charts(_) => None,
        }
    }
}

/// Tables built from a request before selection and charting.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    /// Union of every input that loaded; `None` when none did.
    pub table: Option<MetricTable>,
    pub failures: Vec<SourceFailure>,
    /// Number of inputs present in the request, loaded or not.
    pub provided: usize,
}

/// Parse one input into a table, applying the requested epoch order.
pub fn load_table(
    bytes: &[u8],
    source: SourceKind,
    order: EpochOrder,
) -> Result<MetricTable, SourceError> {
    let log = parse_metric_log(bytes)?;
    let mut table = MetricTable::from_log(log, source)?;
    if order == EpochOrder::Numeric {
        table.sort_by_epoch();
    }
    Ok(table)
}

/// Load every provided input, collecting per-source failures.
pub fn prepare(request: &RenderRequest<'_>) -> Prepared {
    let mut tables = Vec::new();
    let mut failures = Vec::new();
    let mut provided = 0;
    for source in SourceKind::ALL {
        let Some(bytes) = request.source(source) else {
            continue;
        };
        provided += 1;
        match load_table(bytes, source, request.epoch_order) {
            Ok(table) => tables.push(table),
            Err(err) => {
                tracing::warn!("Skipping {source} metrics: {err}");
                failures.push(SourceFailure {
                    source,
                    message: err.to_string(),
                });
            }
        }
    }
    let table = (!tables.is_empty()).then(|| MetricTable::union(tables));
    Prepared {
        table,
        failures,
        provided,
    }
}

/// Run the whole pipeline for one request.
pub fn render(request: &RenderRequest<'_>) -> Dashboard {
    let prepared = prepare(request);
    if prepared.provided == 0 {
        return Dashboard {
            metrics: Vec::new(),
            failures: Vec::new(),
            view: DashboardView::Notice(Notice::new(NoticeLevel::Info, NO_INPUT_NOTICE)),
        };
    }
    let Some(table) = prepared.table else {
        let text = prepared
            .failures
            .iter()
            .map(|failure| format!("{}: {}", failure.source, failure.message))
            .collect::<Vec<_>>()
            .join("\n");
        return Dashboard {
            metrics: Vec::new(),
            failures: prepared.failures,
            view: DashboardView::Notice(Notice::new(
                NoticeLevel::Error,
                format!("Could not load any metric file.\n{text}"),
            )),
        };
    };

    let metrics = table.metric_names().to_vec();
    let selected = request.selection.resolve(&metrics);
    let view = if selected.is_empty() {
        DashboardView::Notice(Notice::new(NoticeLevel::Warning, EMPTY_SELECTION_NOTICE))
    } else {
        match build_charts(&table, &selected, request.mode) {
            Ok(charts) => DashboardView::Charts(charts),
            Err(err) => {
                tracing::warn!("Chart construction failed: {err}");
                DashboardView::Notice(Notice::new(NoticeLevel::Error, err.to_string()))
            }
        }
    };
    tracing::debug!(
        "Rendered {} rows, {} metrics ({} selected) in {} mode",
        table.len(),
        metrics.len(),
        selected.len(),
        request.mode.label()
    );
    Dashboard {
        metrics,
        failures: prepared.failures,
        view,
    }
}

fn build_charts(
    table: &MetricTable,
    selected: &[String],
    mode: PlotMode,
) -> Result<Vec<ChartSpec>, ChartError> {
    match mode {
        PlotMode::Combined => {
            let long = melt(table, selected)?;
            Ok(vec![combined_chart(&long)?])
        }
        PlotMode::Individual => selected
            .iter()
            .map(|metric| individual_chart(table, metric))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRAIN: &[u8] = br#"{"0": {"loss": 1.0, "acc": 0.1}, "1": {"loss": 0.5, "acc": 0.3}}"#;
    const TEST: &[u8] = br#"{"0": {"loss": 0.9, "acc": 0.2}}"#;

    #[test]
    fn individual_mode_draws_one_chart_per_metric() {
        let request = RenderRequest::new(PlotMode::Individual)
            .with_source(SourceKind::Training, TRAIN)
            .with_source(SourceKind::Testing, TEST);
        let dashboard = render(&request);
        let titles: Vec<_> = dashboard.charts().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["loss Over Epochs", "acc Over Epochs"]);
        assert!(dashboard.failures.is_empty());
    }

    #[test]
    fn combined_mode_draws_a_single_chart() {
        let request = RenderRequest::new(PlotMode::Combined)
            .with_source(SourceKind::Training, TRAIN)
            .with_selection(MetricSelection::Only(vec!["acc".into()]));
        let dashboard = render(&request);
        assert_eq!(dashboard.charts().len(), 1);
        assert_eq!(dashboard.charts()[0].series.len(), 1);
        assert_eq!(dashboard.metrics, ["loss", "acc"]);
    }

    #[test]
    fn selection_of_unknown_metrics_only_warns() {
        let request = RenderRequest::new(PlotMode::Combined)
            .with_source(SourceKind::Training, TRAIN)
            .with_selection(MetricSelection::Only(vec!["f1".into()]));
        let notice = render(&request).notice().cloned().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.text, EMPTY_SELECTION_NOTICE);
    }

    #[test]
    fn every_source_failing_is_an_error_notice() {
        let request = RenderRequest::new(PlotMode::Combined)
            .with_source(SourceKind::Training, b"nope")
            .with_source(SourceKind::Testing, b"[]");
        let dashboard = render(&request);
        let notice = dashboard.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.text.contains("Training"));
        assert!(notice.text.contains("Testing"));
        assert_eq!(dashboard.failures.len(), 2);
    }

    #[test]
    fn non_numeric_values_become_an_error_notice() {
        let request = RenderRequest::new(PlotMode::Individual)
            .with_source(SourceKind::Training, br#"{"0": {"loss": "n/a"}}"#);
        let notice = render(&request).notice().cloned().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.text.contains("loss"));
    }

    #[test]
    fn input_order_is_kept_when_requested() {
        let bytes = br#"{"10": {"loss": 0.1}, "2": {"loss": 0.5}}"#;
        let numeric = load_table(bytes, SourceKind::Training, EpochOrder::Numeric).unwrap();
        let input = load_table(bytes, SourceKind::Training, EpochOrder::Input).unwrap();
        let epochs = |t: &MetricTable| t.rows().iter().map(|r| r.epoch).collect::<Vec<_>>();
        assert_eq!(epochs(&numeric), [2, 10]);
        assert_eq!(epochs(&input), [10, 2]);
    }

    #[test]
    fn empty_log_counts_as_loaded_but_has_nothing_to_plot() {
        let request =
            RenderRequest::new(PlotMode::Combined).with_source(SourceKind::Testing, b"{}");
        let dashboard = render(&request);
        assert!(dashboard.metrics.is_empty());
        assert_eq!(dashboard.notice().unwrap().level, NoticeLevel::Warning);
    }
}
