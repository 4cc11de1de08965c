mod app;
mod color;
mod data;
mod export;
mod state;
mod ui;

use std::path::PathBuf;

use app::StationViewApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let mut app = StationViewApp::default();
    // Optional survey file on the command line opens straight away.
    if let Some(arg) = std::env::args().nth(1) {
        app.state.open_survey(&PathBuf::from(arg));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "StationView – Pipeline Survey Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
