use eframe::egui::{self, RichText, Ui};

use super::EguiApp;
use super::style;
use crate::dashboard::PlotMode;
use crate::metrics::{EpochOrder, SourceKind};

impl EguiApp {
    pub(super) fn render_sidebar(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        egui::ScrollArea::vertical()
            .id_salt("sidebar_scroll")
            .show(ui, |ui| {
                ui.label(RichText::new("Metric files").color(palette.text_primary).strong());
                ui.add_space(4.0);
                for kind in SourceKind::ALL {
                    self.render_source_slot(ui, kind);
                    ui.add_space(6.0);
                }
                ui.separator();
                self.render_mode_picker(ui);
                ui.separator();
                self.render_metric_checklist(ui);
                ui.separator();
                self.render_epoch_order(ui);
                ui.separator();
                let can_export = !self.controller.dashboard().charts().is_empty();
                if ui
                    .add_enabled(can_export, egui::Button::new("Export SVG…"))
                    .on_hover_text("Write every chart to a folder as SVG")
                    .clicked()
                {
                    self.controller.export_via_dialog();
                }
            });
    }

    fn render_source_slot(&mut self, ui: &mut Ui, kind: SourceKind) {
        let palette = style::palette();
        let view = self.controller.ui.sources[kind.index()].clone();
        ui.horizontal(|ui| {
            if ui.button(format!("Load {} JSON", kind.label())).clicked() {
                self.controller.load_source_via_dialog(kind);
            }
            if view.file_name.is_some() && ui.small_button("✕").on_hover_text("Clear").clicked() {
                self.controller.clear_source(kind);
            }
        });
        match (&view.file_name, &view.path) {
            (Some(name), Some(path)) => {
                ui.label(RichText::new(name).color(palette.text_primary))
                    .on_hover_text(path);
            }
            _ => {
                ui.label(RichText::new("No file").color(palette.text_muted));
            }
        }
        if let Some(error) = &view.error {
            ui.label(RichText::new(error).color(palette.error).small());
        }
    }

    fn render_mode_picker(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.label(RichText::new("Plot mode").color(palette.text_primary).strong());
        let mut mode = self.controller.mode();
        for option in PlotMode::ALL {
            ui.radio_value(&mut mode, option, option.label());
        }
        self.controller.set_mode(mode);
    }

    fn render_metric_checklist(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.horizontal(|ui| {
            ui.label(RichText::new("Metrics").color(palette.text_primary).strong());
            if ui.small_button("All").clicked() {
                self.controller.select_all_metrics();
            }
            if ui.small_button("None").clicked() {
                self.controller.clear_metric_selection();
            }
        });
        let metrics = self.controller.ui.metrics.clone();
        if metrics.is_empty() {
            ui.label(RichText::new("Load a file to list metrics").color(palette.text_muted));
            return;
        }
        for metric in &metrics {
            let mut selected = metric.selected;
            if ui.checkbox(&mut selected, &metric.name).changed() {
                self.controller.toggle_metric(&metric.name);
            }
        }
    }

    fn render_epoch_order(&mut self, ui: &mut Ui) {
        let mut numeric = self.controller.epoch_order() == EpochOrder::Numeric;
        if ui
            .checkbox(&mut numeric, "Sort epochs numerically")
            .on_hover_text("Off keeps the order epochs appear in each file")
            .changed()
        {
            let order = if numeric {
                EpochOrder::Numeric
            } else {
                EpochOrder::Input
            };
            self.controller.set_epoch_order(order);
        }
    }
}
