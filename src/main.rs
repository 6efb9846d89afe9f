mod analysis;
mod app;
mod color;
mod config;
mod data;
mod error;
mod export;
mod state;
mod ui;

use app::GageRrApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gage R&R – Measurement System Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(GageRrApp::new(config)))),
    )
}
