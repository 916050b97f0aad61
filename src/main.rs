//! Diabetes Predictor - Risk estimation from clinical measurements
//!
//! Loads the diabetes dataset, trains a random forest and shows the predicted
//! probability for the values entered in the form.

mod charts;
mod config;
mod data;
mod gui;
mod logging;
mod model;
mod session;
mod stats;

use config::AppConfig;
use eframe::egui;
use gui::DiabetesApp;

fn main() -> eframe::Result<()> {
    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // A broken config file still opens the window, with defaults and a warning
    let (config, config_warning) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => {
            tracing::warn!("Using default configuration: {}", e);
            (AppConfig::default(), Some(e.to_string()))
        }
    };

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([400.0, 600.0])
            .with_min_inner_size([360.0, 480.0])
            .with_title("Diabetes Prediction App"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Diabetes Prediction App",
        options,
        Box::new(|cc| Ok(Box::new(DiabetesApp::new(cc, config, config_warning)))),
    )
}
