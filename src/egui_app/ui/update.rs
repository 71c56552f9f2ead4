use std::path::PathBuf;

use eframe::egui;

use super::EguiApp;

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.handle_dropped_files(ctx);
        self.render_panels(ctx);
    }
}

impl EguiApp {
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped_files.is_empty() {
            return;
        }
        let files = dropped_files
            .into_iter()
            .map(|file| {
                let path = file.path.unwrap_or_else(|| PathBuf::from(file.name));
                (path, file.bytes.map(|bytes| bytes.to_vec()))
            })
            .collect();
        self.controller.handle_dropped_files(files);
    }
}
