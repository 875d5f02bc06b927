//! Dataset Visualizer - upload a CSV or Excel file, preview it and browse ten charts.
//!
//! Set `RUST_LOG=debug` to trace loading and chart building.

mod charts;
mod config;
mod cycle;
mod data;
mod error;
mod gui;
mod stats;

use config::{APP_TITLE, WINDOW_MIN_SIZE, WINDOW_SIZE};
use eframe::egui;
use gui::VisualizerApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(WINDOW_MIN_SIZE)
            .with_title(APP_TITLE)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    log::info!("Starting {}", APP_TITLE);

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(VisualizerApp::new(cc)))),
    )
}
