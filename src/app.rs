use eframe::egui;

use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::{detail, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LvbViewerApp {
    pub state: AppState,
}

impl LvbViewerApp {
    /// Build the app and load the configured dataset.
    pub fn new(config: &ViewerConfig) -> Self {
        let mut state = AppState::new(config.data_path.clone());
        state.load();
        Self { state }
    }
}

impl eframe::App for LvbViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: selected video ----
        egui::CentralPanel::default().show(ctx, |ui| {
            detail::central_panel(ui, &mut self.state);
        });
    }
}
