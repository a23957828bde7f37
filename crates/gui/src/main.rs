mod app;

// Re-export library modules so that `crate::state`, `crate::dimension`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use dimviewer_lib::dimension;
pub use dimviewer_lib::fixtures;
pub use dimviewer_lib::state;
pub use dimviewer_lib::viewport;

use app::ViewerApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dimviewer=info".into()),
        )
        .init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("dimviewer: 3D dimensioning")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "dimviewer",
        native_options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(cc)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}
