//! Shared state types for the egui UI.

use crate::dashboard::NoticeLevel;
use crate::egui_app::ui::style;
use crate::metrics::SourceKind;
use egui::Color32;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    /// One entry per input slot, in [`SourceKind::ALL`] order.
    pub sources: [SourceSlotView; 2],
    /// Discovered metrics with their checkbox state.
    pub metrics: Vec<MetricToggleView>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            sources: SourceKind::ALL.map(SourceSlotView::empty),
            metrics: Vec::new(),
        }
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self::new("Load a training or testing JSON file to get started", StatusTone::Idle)
    }

    pub fn new(text: impl Into<String>, tone: StatusTone) -> Self {
        Self {
            text: text.into(),
            badge_label: tone.label().to_string(),
            badge_color: style::status_badge_color(tone),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Info,
    Warning,
    Error,
}

impl StatusTone {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

impl From<NoticeLevel> for StatusTone {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Info => Self::Info,
            NoticeLevel::Warning => Self::Warning,
            NoticeLevel::Error => Self::Error,
        }
    }
}

/// Sidebar row describing one input slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceSlotView {
    pub kind: SourceKind,
    pub file_name: Option<String>,
    /// Full path shown on hover.
    pub path: Option<String>,
    /// Load or parse error for the current file, if any.
    pub error: Option<String>,
}

impl SourceSlotView {
    pub fn empty(kind: SourceKind) -> Self {
        Self {
            kind,
            file_name: None,
            path: None,
            error: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricToggleView {
    pub name: String,
    pub selected: bool,
}
