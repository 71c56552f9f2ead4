//! Metric log ingestion and reshaping.
//!
//! A metric log is a JSON object keyed by epoch whose values map metric names
//! to numbers. Logs are parsed per source, turned into wide tables (one row per
//! epoch), unioned, and optionally melted into long rows for combined plots.

use serde::{Deserialize, Serialize};

/// JSON parsing of raw metric logs.
pub mod ingest;
/// Long-format unpivoting of metric tables.
pub mod melt;
/// Wide metric tables and their union.
pub mod table;

pub use ingest::{EpochEntry, IngestError, MetricLog, parse_metric_log, read_metric_file};
pub use melt::{LongRecord, melt};
pub use table::{EPOCH_COLUMN, MetricRecord, MetricTable, TYPE_COLUMN, TableError};

/// Which input slot a metric log was loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Training,
    Testing,
}

impl SourceKind {
    /// Both slots in union order.
    pub const ALL: [SourceKind; 2] = [SourceKind::Training, SourceKind::Testing];

    /// Label written into the `type` column and shown in legends.
    pub fn label(self) -> &'static str {
        match self {
            Self::Training => "Training",
            Self::Testing => "Testing",
        }
    }

    /// Position of the slot within [`SourceKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Training => 0,
            Self::Testing => 1,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How rows are ordered within each source before the union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpochOrder {
    /// Stable sort by parsed epoch value.
    #[default]
    Numeric,
    /// Keep the key order of the JSON object.
    Input,
}
