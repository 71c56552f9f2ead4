use crate::config::{self, AppSettings};
use crate::dashboard::{self, Dashboard, MetricSelection, PlotMode, RenderRequest};
use crate::egui_app::state::*;
use crate::export::{self, ExportError};
use crate::metrics::{EpochOrder, SourceKind, read_metric_file};
use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// A metric file held in memory for re-rendering.
#[derive(Clone, Debug)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl LoadedSource {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// Holds the user's inputs and the last rendered dashboard.
///
/// Every change rebuilds the dashboard from the raw bytes; nothing derived
/// from a previous render is reused.
pub struct DashboardController {
    pub ui: UiState,
    settings: AppSettings,
    /// Where settings are saved; `None` keeps them in memory only.
    settings_path: Option<PathBuf>,
    sources: [Option<LoadedSource>; 2],
    mode: PlotMode,
    selection: MetricSelection,
    epoch_order: EpochOrder,
    dashboard: Dashboard,
}

impl DashboardController {
    /// Create a controller seeded from `settings` without persisting changes.
    pub fn new(settings: AppSettings) -> Self {
        let mut controller = Self {
            ui: UiState::default(),
            mode: settings.display.default_mode,
            epoch_order: settings.display.epoch_order,
            settings,
            settings_path: None,
            sources: [None, None],
            selection: MetricSelection::All,
            dashboard: dashboard::render(&RenderRequest::default()),
        };
        controller.refresh();
        controller
    }

    /// Load persisted settings and save later changes back to the same file.
    pub fn load_configuration(&mut self) -> Result<(), config::ConfigError> {
        let path = config::config_path()?;
        let settings = config::load_from_path(&path)?;
        self.mode = settings.display.default_mode;
        self.epoch_order = settings.display.epoch_order;
        self.settings = settings;
        self.settings_path = Some(path);
        self.refresh();
        Ok(())
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn mode(&self) -> PlotMode {
        self.mode
    }

    pub fn epoch_order(&self) -> EpochOrder {
        self.epoch_order
    }

    pub fn selection(&self) -> &MetricSelection {
        &self.selection
    }

    pub fn source(&self, kind: SourceKind) -> Option<&LoadedSource> {
        self.sources[kind.index()].as_ref()
    }

    /// Pick a JSON file for `kind` via the native file dialog.
    pub fn load_source_via_dialog(&mut self, kind: SourceKind) {
        let mut dialog = FileDialog::new()
            .set_title(format!("Load {} JSON", kind.label()))
            .add_filter("JSON", &["json"]);
        if let Some(dir) = &self.settings.last_open_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.pick_file() else {
            return;
        };
        if let Err(error) = self.load_source_from_path(kind, path) {
            self.set_status(error, StatusTone::Error);
        }
    }

    /// Read `path` into the `kind` slot and re-render.
    pub fn load_source_from_path(&mut self, kind: SourceKind, path: PathBuf) -> Result<(), String> {
        let bytes = read_metric_file(&path).map_err(|err| err.to_string())?;
        if let Some(parent) = path.parent() {
            self.remember_open_dir(parent);
        }
        self.load_source_bytes(kind, path, bytes);
        Ok(())
    }

    /// Put already-read bytes into the `kind` slot and re-render.
    pub fn load_source_bytes(&mut self, kind: SourceKind, path: PathBuf, bytes: Vec<u8>) {
        tracing::info!("Loaded {kind} metrics from {} ({} bytes)", path.display(), bytes.len());
        let source = LoadedSource { path, bytes };
        let name = source.file_name();
        self.sources[kind.index()] = Some(source);
        self.set_status(format!("Loaded {kind} metrics from {name}"), StatusTone::Info);
        self.refresh();
    }

    /// Route files dropped onto the window to slots by name.
    pub fn handle_dropped_files(&mut self, files: Vec<(PathBuf, Option<Vec<u8>>)>) {
        for (path, bytes) in files {
            let occupied = SourceKind::ALL.map(|kind| self.source(kind).is_some());
            let kind = slot_for_dropped_file(&path, occupied);
            let result = match bytes {
                Some(bytes) => {
                    self.load_source_bytes(kind, path, bytes);
                    Ok(())
                }
                None => self.load_source_from_path(kind, path),
            };
            if let Err(error) = result {
                self.set_status(error, StatusTone::Error);
            }
        }
    }

    pub fn clear_source(&mut self, kind: SourceKind) {
        if self.sources[kind.index()].take().is_some() {
            self.set_status(format!("Cleared {kind} metrics"), StatusTone::Info);
            self.refresh();
        }
    }

    pub fn set_mode(&mut self, mode: PlotMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.settings.display.default_mode = mode;
        self.persist_settings();
        self.refresh();
    }

    pub fn set_epoch_order(&mut self, order: EpochOrder) {
        if self.epoch_order == order {
            return;
        }
        self.epoch_order = order;
        self.settings.display.epoch_order = order;
        self.persist_settings();
        self.refresh();
    }

    pub fn toggle_metric(&mut self, metric: &str) {
        self.selection = self.selection.toggled(metric, &self.dashboard.metrics);
        self.refresh();
    }

    pub fn select_all_metrics(&mut self) {
        self.selection = MetricSelection::All;
        self.refresh();
    }

    pub fn clear_metric_selection(&mut self) {
        self.selection = MetricSelection::Only(Vec::new());
        self.refresh();
    }

    /// Pick a folder and write every visible chart into it as SVG.
    pub fn export_via_dialog(&mut self) {
        let mut dialog = FileDialog::new().set_title("Export charts as SVG");
        if let Some(dir) = &self.settings.last_open_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(dir) = dialog.pick_folder() else {
            return;
        };
        match self.export_to_dir(&dir) {
            Ok(written) => self.set_status(
                format!("Exported {} chart(s) to {}", written.len(), dir.display()),
                StatusTone::Info,
            ),
            Err(err) => self.set_status(format!("Export failed: {err}"), StatusTone::Error),
        }
    }

    pub fn export_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        export::export_charts(self.dashboard.charts(), dir, self.settings.export.size())
    }

    fn request(&self) -> RenderRequest<'_> {
        let mut request = RenderRequest::new(self.mode)
            .with_selection(self.selection.clone())
            .with_epoch_order(self.epoch_order);
        for kind in SourceKind::ALL {
            if let Some(source) = self.source(kind) {
                request = request.with_source(kind, &source.bytes);
            }
        }
        request
    }

    fn refresh(&mut self) {
        let mut dashboard = dashboard::render(&self.request());
        if dashboard.metrics != self.dashboard.metrics && self.selection != MetricSelection::All {
            tracing::debug!("Metric set changed; selecting all metrics");
            self.selection = MetricSelection::All;
            dashboard = dashboard::render(&self.request());
        }
        self.dashboard = dashboard;
        self.refresh_sources_ui();
        self.refresh_metrics_ui();
        if !self.dashboard.failures.is_empty() {
            let skipped: Vec<String> = self
                .dashboard
                .failures
                .iter()
                .map(|failure| failure.source.to_string())
                .collect();
            self.set_status(
                format!("Skipped {} metrics: invalid file", skipped.join(" and ")),
                StatusTone::Warning,
            );
        }
    }

    fn refresh_sources_ui(&mut self) {
        for kind in SourceKind::ALL {
            let mut view = SourceSlotView::empty(kind);
            if let Some(source) = self.source(kind) {
                view.file_name = Some(source.file_name());
                view.path = Some(source.path.to_string_lossy().into_owned());
            }
            view.error = self
                .dashboard
                .failures
                .iter()
                .find(|failure| failure.source == kind)
                .map(|failure| failure.message.clone());
            self.ui.sources[kind.index()] = view;
        }
    }

    fn refresh_metrics_ui(&mut self) {
        self.ui.metrics = self
            .dashboard
            .metrics
            .iter()
            .map(|name| MetricToggleView {
                name: name.clone(),
                selected: self.selection.contains(name),
            })
            .collect();
    }

    fn remember_open_dir(&mut self, dir: &Path) {
        if self.settings.last_open_dir.as_deref() == Some(dir) {
            return;
        }
        self.settings.last_open_dir = Some(dir.to_path_buf());
        self.persist_settings();
    }

    fn persist_settings(&mut self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(err) = config::save_to_path(&self.settings, path) {
            tracing::warn!("Failed to save settings: {err}");
            self.set_status(format!("Failed to save settings: {err}"), StatusTone::Warning);
        }
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status = StatusBarState::new(text, tone);
    }
}

/// Choose a slot for a dropped file.
///
/// The file stem is split into words on anything that is not a letter or
/// digit. A testing or validation word sends the file to the testing slot, a
/// training word to the training slot; anything else fills the training slot
/// first, then testing once training is taken.
pub fn slot_for_dropped_file(path: &Path, occupied: [bool; 2]) -> SourceKind {
    const TESTING_WORDS: [&str; 6] = ["test", "testing", "val", "valid", "validation", "eval"];
    const TRAINING_WORDS: [&str; 2] = ["train", "training"];
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let words: Vec<&str> = stem
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    if words.iter().any(|word| TESTING_WORDS.contains(word)) {
        return SourceKind::Testing;
    }
    if words.iter().any(|word| TRAINING_WORDS.contains(word)) {
        return SourceKind::Training;
    }
    if occupied[SourceKind::Training.index()] && !occupied[SourceKind::Testing.index()] {
        SourceKind::Testing
    } else {
        SourceKind::Training
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{DashboardView, NoticeLevel};

    fn controller() -> DashboardController {
        DashboardController::new(AppSettings::default())
    }

    fn load(controller: &mut DashboardController, kind: SourceKind, json: &str) {
        controller.load_source_bytes(
            kind,
            PathBuf::from(format!("{}.json", kind.label().to_lowercase())),
            json.as_bytes().to_vec(),
        );
    }

    #[test]
    fn starts_with_info_notice() {
        let controller = controller();
        let notice = controller.dashboard().notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert!(controller.ui.metrics.is_empty());
    }

    #[test]
    fn loading_sources_discovers_metrics_and_draws_charts() {
        let mut controller = controller();
        load(&mut controller, SourceKind::Training, r#"{"0": {"loss": 1.0, "acc": 0.1}}"#);
        load(&mut controller, SourceKind::Testing, r#"{"0": {"loss": 0.9}}"#);
        assert_eq!(controller.dashboard().charts().len(), 1);
        let names: Vec<_> = controller.ui.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["loss", "acc"]);
        assert!(controller.ui.metrics.iter().all(|m| m.selected));
        assert_eq!(
            controller.ui.sources[SourceKind::Testing.index()].file_name.as_deref(),
            Some("testing.json")
        );
    }

    #[test]
    fn unticking_every_metric_shows_warning() {
        let mut controller = controller();
        load(&mut controller, SourceKind::Training, r#"{"0": {"loss": 1.0}}"#);
        controller.toggle_metric("loss");
        assert_eq!(
            controller.dashboard().notice().map(|n| n.level),
            Some(NoticeLevel::Warning)
        );
        controller.select_all_metrics();
        assert!(matches!(controller.dashboard().view, DashboardView::Charts(_)));
    }

    #[test]
    fn individual_mode_splits_charts() {
        let mut controller = controller();
        load(&mut controller, SourceKind::Training, r#"{"0": {"loss": 1.0, "acc": 0.1}}"#);
        controller.set_mode(PlotMode::Individual);
        assert_eq!(controller.dashboard().charts().len(), 2);
    }

    #[test]
    fn invalid_file_is_reported_on_its_slot_only() {
        let mut controller = controller();
        load(&mut controller, SourceKind::Training, r#"{"0": {"loss": 1.0}}"#);
        load(&mut controller, SourceKind::Testing, "not json");
        assert_eq!(controller.dashboard().charts().len(), 1);
        assert!(controller.ui.sources[SourceKind::Testing.index()].error.is_some());
        assert!(controller.ui.sources[SourceKind::Training.index()].error.is_none());
        assert_eq!(controller.ui.status.badge_label, "Warning");
    }

    #[test]
    fn clearing_last_source_returns_to_info_notice() {
        let mut controller = controller();
        load(&mut controller, SourceKind::Training, r#"{"0": {"loss": 1.0}}"#);
        controller.clear_source(SourceKind::Training);
        assert!(controller.source(SourceKind::Training).is_none());
        assert_eq!(
            controller.dashboard().notice().map(|n| n.level),
            Some(NoticeLevel::Info)
        );
    }

    #[test]
    fn settings_are_persisted_when_a_path_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(config::CONFIG_FILE_NAME);
        let mut controller = controller();
        controller.settings_path = Some(path.clone());
        controller.set_mode(PlotMode::Individual);
        controller.set_epoch_order(EpochOrder::Input);
        let saved = config::load_from_path(&path).unwrap();
        assert_eq!(saved.display.default_mode, PlotMode::Individual);
        assert_eq!(saved.display.epoch_order, EpochOrder::Input);
    }

    #[test]
    fn exports_visible_charts() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller();
        load(&mut controller, SourceKind::Training, r#"{"0": {"loss": 1.0}, "1": {"loss": 0.4}}"#);
        let written = controller.export_to_dir(dir.path()).unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].exists());
    }

    #[test]
    fn dropped_files_are_routed_by_name() {
        let none = [false, false];
        assert_eq!(
            slot_for_dropped_file(Path::new("run/test_metrics.json"), none),
            SourceKind::Testing
        );
        assert_eq!(
            slot_for_dropped_file(Path::new("val.json"), none),
            SourceKind::Testing
        );
        assert_eq!(
            slot_for_dropped_file(Path::new("train.json"), [true, false]),
            SourceKind::Training
        );
        assert_eq!(
            slot_for_dropped_file(Path::new("metrics.json"), none),
            SourceKind::Training
        );
        assert_eq!(
            slot_for_dropped_file(Path::new("metrics.json"), [true, false]),
            SourceKind::Testing
        );
    }

    #[test]
    fn dropped_file_hints_match_whole_words() {
        let none = [false, false];
        assert_eq!(
            slot_for_dropped_file(Path::new("train_interval.json"), none),
            SourceKind::Training
        );
        assert_eq!(
            slot_for_dropped_file(Path::new("latest-run.json"), none),
            SourceKind::Training
        );
        assert_eq!(
            slot_for_dropped_file(Path::new("model-eval.json"), none),
            SourceKind::Testing
        );
        assert_eq!(
            slot_for_dropped_file(Path::new("Validation Metrics.json"), none),
            SourceKind::Testing
        );
    }

    #[test]
    fn new_metrics_are_selected_when_the_metric_set_changes() {
        let mut controller = controller();
        load(&mut controller, SourceKind::Training, r#"{"0": {"loss": 1.0, "acc": 0.1}}"#);
        controller.toggle_metric("acc");
        assert!(!controller.selection().contains("acc"));
        load(&mut controller, SourceKind::Testing, r#"{"0": {"f1": 0.5}}"#);
        assert_eq!(controller.selection(), &MetricSelection::All);
        let names: Vec<_> = controller.ui.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["loss", "acc", "f1"]);
        assert!(controller.ui.metrics.iter().all(|m| m.selected));
    }

    #[test]
    fn selection_survives_reload_with_the_same_metrics() {
        let mut controller = controller();
        load(&mut controller, SourceKind::Training, r#"{"0": {"loss": 1.0, "acc": 0.1}}"#);
        controller.toggle_metric("acc");
        load(&mut controller, SourceKind::Training, r#"{"0": {"loss": 0.8, "acc": 0.2}}"#);
        assert!(controller.selection().contains("loss"));
        assert!(!controller.selection().contains("acc"));
    }
}
