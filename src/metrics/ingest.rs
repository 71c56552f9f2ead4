use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while reading or parsing a metric log.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The bytes are not valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The document is valid JSON but not an object keyed by epoch.
    #[error("Expected a JSON object keyed by epoch, found {found}")]
    NotAnObject { found: &'static str },
    /// One epoch's entry is not an object of metrics.
    #[error("Epoch {epoch} should map metric names to values, found {found}")]
    EpochNotObject { epoch: String, found: &'static str },
}

/// Metrics recorded for one epoch key, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochEntry {
    pub key: String,
    pub values: Map<String, Value>,
}

/// A parsed metric log: epoch entries in the order the document lists them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricLog {
    pub entries: Vec<EpochEntry>,
}

impl MetricLog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse raw bytes into a metric log.
///
/// Values are kept as raw JSON; numeric checks happen when charts are built.
pub fn parse_metric_log(bytes: &[u8]) -> Result<MetricLog, IngestError> {
    let document: Value = serde_json::from_slice(bytes)?;
    let Value::Object(epochs) = document else {
        return Err(IngestError::NotAnObject {
            found: json_kind(&document),
        });
    };
    let mut entries = Vec::with_capacity(epochs.len());
    for (key, value) in epochs {
        match value {
            Value::Object(values) => entries.push(EpochEntry { key, values }),
            other => {
                return Err(IngestError::EpochNotObject {
                    epoch: key,
                    found: json_kind(&other),
                });
            }
        }
    }
    Ok(MetricLog { entries })
}

/// Read a metric log file into memory without parsing it.
pub fn read_metric_file(path: &Path) -> Result<Vec<u8>, IngestError> {
    std::fs::read(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
