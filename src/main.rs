mod app;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::LvbViewerApp;
use config::{ViewerConfig, WINDOW_TITLE};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.inner_size)
            .with_min_inner_size(config.min_inner_size),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(LvbViewerApp::new(&config)))),
    )
}
