//! Main application module

mod keyboard;
mod options;
mod viewport;

use std::time::Instant;

use eframe::egui;

use crate::fixtures;
use crate::state::{HistoryPhase, ViewerSession, ViewerSettings};
use crate::viewport::edge::{extract_sharp_edges, MeshEdge};

/// Dihedral angle above which mesh edges are drawn in the wireframe
const WIREFRAME_EDGE_DEGREES: f32 = 25.0;

/// Main application
pub struct ViewerApp {
    session: ViewerSession,
    settings: ViewerSettings,
    /// Feature edges of every pickable object, drawn as wireframe
    wireframe: Vec<MeshEdge>,
    show_options: bool,
    started: Instant,
}

impl ViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = ViewerSettings::load();
        let mut session = match ViewerSession::new(&settings) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Invalid settings, using defaults: {e}");
                ViewerSession::default()
            }
        };

        let objects = fixtures::demo_scene();
        let wireframe = objects
            .iter()
            .flat_map(|o| extract_sharp_edges(&o.mesh, WIREFRAME_EDGE_DEGREES))
            .collect();
        session.set_objects(objects);
        session.tool.enable();

        Self {
            session,
            settings,
            wireframe,
            show_options: true,
            started: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now_ms = self.now_ms();

        // The camera jumps to replayed poses without smoothing, so it has
        // settled by the next frame
        if self.session.history().phase() == (HistoryPhase::Replaying { awaiting_camera: true }) {
            self.session.notify_camera_settled();
        }
        self.session.tick(now_ms);

        keyboard::handle_keyboard(ctx, &mut self.session);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("View", |ui| {
                    if ui.button("Dimension options").clicked() {
                        self.show_options = true;
                        ui.close_menu();
                    }
                });
            });
        });

        options::options_window(ctx, &mut self.show_options, &mut self.session, &mut self.settings);

        // ── Status bar ────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let history = self.session.history();
            ui.horizontal(|ui| {
                ui.label(format!("Tool: {:?}", self.session.tool.state()));
                ui.separator();
                ui.label(format!("Dimensions: {}", self.session.tool.measurement_count()));
                ui.separator();
                ui.label(format!(
                    "History: {}/{}",
                    history.cursor().map_or(0, |c| c + 1),
                    history.len()
                ));
                ui.separator();
                ui.label("Shift+click to measure, double Shift+click to select");
            });
        });

        // ── Viewport ──────────────────────────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::from_rgb(30, 32, 38)))
            .show(ctx, |ui| {
                viewport::show(ui, &mut self.session, &self.wireframe, now_ms);
            });

        // Keep ticking for the click window, camera debounce and snap pulse
        ctx.request_repaint();
    }
}
