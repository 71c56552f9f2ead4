use serde_json::{Map, Value};
use thiserror::Error;

use super::SourceKind;
use super::ingest::MetricLog;

/// Identifying column holding the parsed epoch.
pub const EPOCH_COLUMN: &str = "epoch";
/// Identifying column holding the source label.
pub const TYPE_COLUMN: &str = "type";

/// Errors raised while reshaping metric logs into tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// An epoch key could not be parsed as an integer.
    #[error("Epoch key {key:?} is not an integer")]
    InvalidEpoch { key: String },
    /// A metric column was requested that the table does not contain.
    #[error("Unknown metric column {0:?}")]
    UnknownMetric(String),
}

/// One row of a wide metric table.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub epoch: i64,
    pub source: SourceKind,
    /// Metric values as loaded; never contains the identifying columns.
    pub values: Map<String, Value>,
}

impl MetricRecord {
    /// Value for `metric`, or `None` when the cell is null or absent.
    pub fn value(&self, metric: &str) -> Option<&Value> {
        self.values.get(metric).filter(|value| !value.is_null())
    }
}

/// Wide table: one row per epoch per source, one column per metric.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricTable {
    metrics: Vec<String>,
    rows: Vec<MetricRecord>,
}

impl MetricTable {
    /// Build a table from a parsed log, tagging every row with `source`.
    pub fn from_log(log: MetricLog, source: SourceKind) -> Result<Self, TableError> {
        let mut table = Self::default();
        for entry in log.entries {
            let epoch = parse_epoch(&entry.key)?;
            let mut values = entry.values;
            for reserved in [EPOCH_COLUMN, TYPE_COLUMN] {
                if values.remove(reserved).is_some() {
                    tracing::warn!(
                        "{source} epoch {epoch}: metric named {reserved:?} is replaced by the identifying column"
                    );
                }
            }
            table.register_metrics(values.keys());
            table.rows.push(MetricRecord {
                epoch,
                source,
                values,
            });
        }
        Ok(table)
    }

    /// Concatenate tables in order; the metric set is the union of all inputs.
    pub fn union(tables: impl IntoIterator<Item = MetricTable>) -> Self {
        let mut combined = Self::default();
        for table in tables {
            combined.register_metrics(table.metrics.iter());
            combined.rows.extend(table.rows);
        }
        combined
    }

    /// Stable sort of rows by epoch.
    pub fn sort_by_epoch(&mut self) {
        self.rows.sort_by_key(|row| row.epoch);
    }

    /// Metric columns in first-seen order.
    pub fn metric_names(&self) -> &[String] {
        &self.metrics
    }

    /// Every column name: metrics followed by the identifying columns.
    pub fn columns(&self) -> Vec<&str> {
        self.metrics
            .iter()
            .map(String::as_str)
            .chain([EPOCH_COLUMN, TYPE_COLUMN])
            .collect()
    }

    pub fn has_metric(&self, metric: &str) -> bool {
        self.metrics.iter().any(|name| name == metric)
    }

    pub fn rows(&self) -> &[MetricRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows loaded from one source, in table order.
    pub fn rows_for(&self, source: SourceKind) -> impl Iterator<Item = &MetricRecord> {
        self.rows.iter().filter(move |row| row.source == source)
    }

    /// Sources present in the table, in first-seen order.
    pub fn sources(&self) -> Vec<SourceKind> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.source) {
                seen.push(row.source);
            }
        }
        seen
    }

    fn register_metrics<'a>(&mut self, names: impl Iterator<Item = &'a String>) {
        for name in names {
            if !self.has_metric(name) {
                self.metrics.push(name.clone());
            }
        }
    }
}

fn parse_epoch(key: &str) -> Result<i64, TableError> {
    key.trim()
        .parse::<i64>()
        .map_err(|_| TableError::InvalidEpoch {
            key: key.to_string(),
        })
}
