//! Overlay Viewer - desktop preview for stream overlay layouts.

mod app;
mod canvas;
mod theme;
mod transform;

use app::ViewerApp;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Optional replay file to start playing
    let initial_file: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Overlay Viewer"),
        vsync: false,
        ..Default::default()
    };

    eframe::run_native(
        "Overlay Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, initial_file)))),
    )
}
