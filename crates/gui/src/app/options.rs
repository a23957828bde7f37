//! Dimension options window

use eframe::egui;
use shared::AlignmentMode;

use crate::dimension::config::MAX_PRECISION;
use crate::dimension::constraint::EdgeStrategy;
use crate::state::{Units, ViewerSession, ViewerSettings};

fn strategy_name(strategy: EdgeStrategy) -> &'static str {
    match strategy {
        EdgeStrategy::NearestMeshEdge => "Nearest mesh edge",
        EdgeStrategy::SurfaceNormal => "Surface normal",
    }
}

/// Show the options window. Changes apply to the session and are saved.
pub fn options_window(
    ctx: &egui::Context,
    open: &mut bool,
    session: &mut ViewerSession,
    settings: &mut ViewerSettings,
) {
    let mut changed = false;

    egui::Window::new("Dimension options")
        .open(open)
        .resizable(false)
        .default_width(260.0)
        .show(ctx, |ui| {
            let mut enabled = session.tool.is_enabled();
            if ui.checkbox(&mut enabled, "Measure tool").changed() {
                if enabled {
                    session.tool.enable();
                } else {
                    session.tool.disable();
                }
            }
            ui.separator();

            // ── Snapping ──────────────────────────────────────
            ui.heading("Snapping");
            if ui.checkbox(&mut settings.snap.enabled, "Snap to points").changed() {
                session.tool.set_snap_enabled(settings.snap.enabled);
                changed = true;
            }
            let mut threshold = settings.snap.threshold;
            ui.horizontal(|ui| {
                ui.label("Radius");
                if ui
                    .add(egui::DragValue::new(&mut threshold).speed(0.01).range(0.01..=5.0))
                    .changed()
                {
                    match session.tool.set_snap_threshold(threshold) {
                        Ok(()) => {
                            settings.snap.threshold = threshold;
                            changed = true;
                        }
                        Err(e) => tracing::warn!("Snap radius rejected: {e}"),
                    }
                }
            });
            ui.add_space(6.0);

            // ── Constraints ───────────────────────────────────
            ui.heading("Constraints");
            let mut orthogonal = session.tool.config().orthogonal();
            if ui.checkbox(&mut orthogonal, "Orthogonal (lock to axes)").changed() {
                session.tool.set_orthogonal(orthogonal);
                changed = true;
            }

            let mut alignment = session.tool.config().alignment();
            egui::ComboBox::from_label("Edge alignment")
                .selected_text(alignment.display_name())
                .show_ui(ui, |ui| {
                    for mode in AlignmentMode::all() {
                        ui.selectable_value(&mut alignment, *mode, mode.display_name());
                    }
                });
            if alignment != session.tool.config().alignment() {
                session.tool.set_alignment(alignment);
                changed = true;
            }

            let mut strategy = settings.constraints.edge_strategy;
            egui::ComboBox::from_label("Reference edge")
                .selected_text(strategy_name(strategy))
                .show_ui(ui, |ui| {
                    for s in [EdgeStrategy::NearestMeshEdge, EdgeStrategy::SurfaceNormal] {
                        ui.selectable_value(&mut strategy, s, strategy_name(s));
                    }
                });
            if strategy != settings.constraints.edge_strategy {
                settings.constraints.edge_strategy = strategy;
                session.tool.set_edge_strategy(strategy);
                changed = true;
            }
            if session.tool.reference_edge().is_none() && alignment.is_active() {
                ui.label("Click a surface to pick the reference edge");
            }
            ui.add_space(6.0);

            // ── Display ───────────────────────────────────────
            ui.heading("Display");
            let mut units = settings.units;
            egui::ComboBox::from_label("Units")
                .selected_text(units.display_name())
                .show_ui(ui, |ui| {
                    for u in Units::all() {
                        ui.selectable_value(&mut units, *u, u.display_name());
                    }
                });
            if units != settings.units {
                settings.units = units;
                session.tool.set_units(units);
                changed = true;
            }
            let mut precision = settings.dimensions.precision;
            if ui
                .add(egui::Slider::new(&mut precision, 0..=MAX_PRECISION).text("Decimals"))
                .changed()
                && session.tool.set_precision(precision).is_ok()
            {
                settings.dimensions.precision = precision;
                changed = true;
            }
            ui.add_space(6.0);

            // ── History ───────────────────────────────────────
            ui.horizontal(|ui| {
                let history = session.history();
                let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    session.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    session.redo();
                }
                if ui.button("Clear all").clicked() {
                    session.clear_all();
                }
            });
        });

    if changed {
        settings.constraints.orthogonal = session.tool.config().orthogonal();
        settings.constraints.alignment = session.tool.config().alignment();
        settings.save();
    }
}
