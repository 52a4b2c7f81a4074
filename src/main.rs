#![warn(clippy::all, rust_2018_idioms)]

use paint_plus::PaintApp;

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 1024.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Paint+"),
        ..Default::default()
    };
    eframe::run_native(
        "Paint+",
        native_options,
        Box::new(|cc| Ok(Box::new(PaintApp::new(cc)))),
    )
}
