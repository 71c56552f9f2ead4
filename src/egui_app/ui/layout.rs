use eframe::egui::{self, Frame, Margin, RichText, StrokeKind, Ui};

use super::EguiApp;
use super::chart_view;
use super::style;
use crate::dashboard::DashboardView;

const PAGE_TITLE: &str = "Performance Metrics Visualization";
const CHART_HEIGHT: f32 = 360.0;

impl EguiApp {
    pub(super) fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    pub(super) fn render_panels(&mut self, ctx: &egui::Context) {
        self.render_status(ctx);
        egui::SidePanel::left("inputs")
            .resizable(true)
            .default_width(260.0)
            .min_width(220.0)
            .max_width(420.0)
            .show(ctx, |ui| self.render_sidebar(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.set_min_height(ui.available_height());
            self.render_center(ui);
        });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = self.controller.ui.status.clone();
                ui.horizontal(|ui| {
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
                    ui.painter().rect_filled(badge_rect, 0.0, status.badge_color);
                    ui.painter().rect_stroke(
                        badge_rect,
                        0.0,
                        egui::Stroke::new(1.0, palette.panel_outline),
                        StrokeKind::Inside,
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(&status.badge_label).color(palette.text_primary));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(palette.text_primary));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        const APP_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));
                        ui.label(RichText::new(APP_VERSION).color(palette.text_muted));
                    });
                });
            });
    }

    fn render_center(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.heading(RichText::new(PAGE_TITLE).color(palette.text_primary));
        ui.add_space(8.0);
        match &self.controller.dashboard().view {
            DashboardView::Notice(notice) => {
                Frame::new()
                    .fill(palette.bg_tertiary)
                    .stroke(egui::Stroke::new(1.0, style::notice_color(notice.level)))
                    .inner_margin(Margin::same(12))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(
                            RichText::new(&notice.text).color(style::notice_color(notice.level)),
                        );
                    });
            }
            DashboardView::Charts(charts) => {
                egui::ScrollArea::vertical()
                    .id_salt("charts_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for (index, chart) in charts.iter().enumerate() {
                            ui.push_id(index, |ui| {
                                chart_view::render_chart(ui, chart, CHART_HEIGHT);
                            });
                            ui.add_space(16.0);
                        }
                    });
            }
        }
    }
}
