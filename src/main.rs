#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_title("Raster Edit")
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "raster_edit",
        native_options,
        Box::new(|cc| Ok(Box::new(raster_edit::EditorApp::new(cc)?))),
    )
}

// On the web the crate is used as a library by the embedding page
#[cfg(target_arch = "wasm32")]
fn main() {}
