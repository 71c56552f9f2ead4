use serde::{Deserialize, Serialize};

use crate::metrics::{EpochOrder, SourceKind};

/// How selected metrics are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    /// Every selected metric on one chart.
    #[default]
    Combined,
    /// One chart per selected metric.
    Individual,
}

impl PlotMode {
    pub const ALL: [PlotMode; 2] = [PlotMode::Combined, PlotMode::Individual];

    pub fn label(self) -> &'static str {
        match self {
            Self::Combined => "Combined",
            Self::Individual => "Individual",
        }
    }

    /// Parse a case-insensitive mode name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "combined" => Some(Self::Combined),
            "individual" => Some(Self::Individual),
            _ => None,
        }
    }
}

/// Which discovered metrics the user wants plotted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MetricSelection {
    /// Every discovered metric, including ones discovered later.
    #[default]
    All,
    /// An explicit list in the user's order.
    Only(Vec<String>),
}

impl MetricSelection {
    /// Metrics to plot given what the loaded tables contain.
    ///
    /// Explicit names keep their order; duplicates and names that were not
    /// discovered are dropped.
    pub fn resolve(&self, discovered: &[String]) -> Vec<String> {
        match self {
            Self::All => discovered.to_vec(),
            Self::Only(names) => {
                let mut resolved: Vec<String> = Vec::with_capacity(names.len());
                for name in names {
                    if discovered.contains(name) && !resolved.contains(name) {
                        resolved.push(name.clone());
                    }
                }
                resolved
            }
        }
    }

    pub fn contains(&self, metric: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.iter().any(|name| name == metric),
        }
    }

    /// Flip one metric, turning `All` into the explicit list it stood for.
    pub fn toggled(&self, metric: &str, discovered: &[String]) -> Self {
        let mut names = self.resolve(discovered);
        if let Some(index) = names.iter().position(|name| name == metric) {
            names.remove(index);
        } else {
            names.push(metric.to_string());
        }
        Self::Only(names)
    }
}

/// Everything one render pass depends on.
///
/// Holds borrowed raw bytes so the caller keeps ownership of loaded files;
/// building a request is cheap enough to do on every change.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest<'a> {
    pub training: Option<&'a [u8]>,
    pub testing: Option<&'a [u8]>,
    pub mode: PlotMode,
    pub selection: MetricSelection,
    pub epoch_order: EpochOrder,
}

impl<'a> RenderRequest<'a> {
    pub fn new(mode: PlotMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: SourceKind, bytes: &'a [u8]) -> Self {
        match source {
            SourceKind::Training => self.training = Some(bytes),
            SourceKind::Testing => self.testing = Some(bytes),
        }
        self
    }

    pub fn with_selection(mut self, selection: MetricSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_epoch_order(mut self, order: EpochOrder) -> Self {
        self.epoch_order = order;
        self
    }

    pub fn source(&self, source: SourceKind) -> Option<&'a [u8]> {
        match source {
            SourceKind::Training => self.training,
            SourceKind::Testing => self.testing,
        }
    }
}
