//! egui renderer for the dashboard.

mod chart_view;
mod layout;
mod sidebar;
pub(crate) mod style;
mod update;

use crate::config::AppSettings;
use crate::egui_app::controller::DashboardController;
use eframe::egui;

/// Smallest window size that still fits the sidebar next to a chart.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(900.0, 560.0);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: DashboardController,
    visuals_set: bool,
}

impl EguiApp {
    /// Create a new egui app, loading persisted configuration.
    pub fn new() -> Result<Self, String> {
        let mut controller = DashboardController::new(AppSettings::default());
        controller
            .load_configuration()
            .map_err(|err| format!("Failed to load config: {err}"))?;
        Ok(Self::with_controller(controller))
    }

    /// Wrap an existing controller without touching the config file.
    pub fn with_controller(controller: DashboardController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }
}
