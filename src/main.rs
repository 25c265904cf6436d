mod app;
mod state;
mod ui;

use std::path::PathBuf;

use app::HrDashboardApp;
use eframe::egui;
use hr_dashboard::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional first argument: dataset to open instead of the configured one.
    let cli_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DashboardConfig::discover(cli_path.clone()).unwrap_or_else(|e| {
        log::error!("Invalid dashboard config ({e}), using defaults");
        DashboardConfig::fallback(DashboardConfig::data_override(cli_path))
    });
    log::info!("Starting {:?} dashboard on {}", config.variant, config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "HR Dashboard – Talent & Performance",
        options,
        Box::new(|_cc| Ok(Box::new(HrDashboardApp::new(config)))),
    )
}
