mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::TrendsheetApp;
use config::Config;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Ignoring configuration: {e:#}");
            Config::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Trendsheet",
        options,
        Box::new(|_cc| Ok(Box::new(TrendsheetApp::new(config)))),
    )
}
