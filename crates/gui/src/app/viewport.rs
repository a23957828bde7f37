//! Viewport input and painter-based rendering

use eframe::egui;
use egui::{Color32, Painter, Stroke};
use glam::Vec3;

use crate::dimension::scene::{PrimitiveRole, Rgba, Shape};
use crate::dimension::PointerEvent;
use crate::state::ViewerSession;
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::edge::MeshEdge;

const WIREFRAME_COLOR: Color32 = Color32::from_rgb(150, 156, 170);

/// Label height on screen per unit of billboard scale
const LABEL_FONT_FACTOR: f32 = 0.4;

pub fn show(ui: &mut egui::Ui, session: &mut ViewerSession, wireframe: &[MeshEdge], now_ms: u64) {
    let (rect, response) =
        ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    let modifiers = ui.input(|i| i.modifiers);

    // ── Camera controls ───────────────────────────────────────
    let mut camera_moved = false;
    if response.dragged_by(egui::PointerButton::Middle)
        || (response.dragged_by(egui::PointerButton::Primary) && !modifiers.shift)
    {
        let delta = response.drag_delta();
        session.camera.rotate(delta.x * 0.5, delta.y * 0.5);
        camera_moved = true;
    }
    if response.dragged_by(egui::PointerButton::Secondary) {
        let delta = response.drag_delta();
        session.camera.pan(-delta.x * 0.01, delta.y * 0.01);
        camera_moved = true;
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll.abs() > 0.1 {
            session.camera.zoom(scroll * 0.01);
            camera_moved = true;
        }
    }
    if camera_moved {
        session.camera_changed(now_ms);
    }

    // ── Dimension input ───────────────────────────────────────
    if let Some(pos) = response.hover_pos() {
        let event = PointerEvent {
            position: pos,
            viewport: rect,
            modifiers,
        };
        if response.clicked() {
            session.pointer_clicked(&event, now_ms);
        } else if !response.dragged() {
            session.pointer_moved(&event);
        }
    }

    let dt = ui.input(|i| i.stable_dt);
    session.tool.update(&session.camera, dt);

    if !ui.is_rect_visible(rect) {
        return;
    }

    let painter = ui.painter_at(rect);
    draw_wireframe(&painter, rect, &session.camera, wireframe);
    draw_dimensions(&painter, rect, session);
    draw_camera_info(&painter, rect, &session.camera);
}

fn color(rgba: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Pixels covered by `world` units at `point`
fn world_to_pixels(camera: &ArcBallCamera, point: Vec3, world: f32, rect: egui::Rect) -> f32 {
    let depth = camera.eye_position().distance(point).max(1e-3);
    world / (depth * (camera.fov * 0.5).tan()) * rect.height() * 0.5
}

fn draw_segment(
    painter: &Painter,
    rect: egui::Rect,
    camera: &ArcBallCamera,
    a: Vec3,
    b: Vec3,
    stroke: Stroke,
) {
    if let (Some(sa), Some(sb)) = (camera.project(a, rect), camera.project(b, rect)) {
        painter.line_segment([sa, sb], stroke);
    }
}

fn draw_wireframe(painter: &Painter, rect: egui::Rect, camera: &ArcBallCamera, edges: &[MeshEdge]) {
    let stroke = Stroke::new(1.0, WIREFRAME_COLOR);
    for edge in edges {
        draw_segment(painter, rect, camera, edge.start, edge.end, stroke);
    }
}

fn draw_dimensions(painter: &Painter, rect: egui::Rect, session: &ViewerSession) {
    let camera = &session.camera;

    for (_, prim) in session.tool.scene().iter() {
        let c = color(prim.color);
        match &prim.shape {
            Shape::Line { start, end } => {
                let width = match prim.role {
                    PrimitiveRole::DimensionLine | PrimitiveRole::ReferenceEdge => 2.0,
                    _ => 1.5,
                };
                draw_segment(painter, rect, camera, *start, *end, Stroke::new(width, c));
            }
            Shape::Marker { center, radius } => {
                if let Some(screen) = camera.project(*center, rect) {
                    let px = world_to_pixels(camera, *center, *radius, rect).max(2.0);
                    if prim.role == PrimitiveRole::SnapIndicator {
                        painter.circle_stroke(screen, px, Stroke::new(2.0, c));
                    } else {
                        painter.circle_filled(screen, px, c);
                    }
                }
            }
            Shape::Label { position, text, scale } => {
                if let Some(screen) = camera.project(*position, rect) {
                    let pixels = world_to_pixels(camera, *position, *scale, rect);
                    let size = (pixels * LABEL_FONT_FACTOR).clamp(8.0, 32.0);
                    let font = egui::FontId::proportional(size);
                    let galley = painter.layout_no_wrap(text.clone(), font, c);
                    let label_rect = egui::Align2::CENTER_CENTER
                        .anchor_size(screen, galley.size())
                        .expand(3.0);
                    let backdrop = Color32::from_rgba_unmultiplied(255, 255, 255, 220);
                    painter.rect_filled(label_rect, 3.0, backdrop);
                    painter.galley(label_rect.min + egui::vec2(3.0, 3.0), galley, c);
                }
            }
        }
    }
}

fn draw_camera_info(painter: &Painter, rect: egui::Rect, camera: &ArcBallCamera) {
    let overlay_rect = egui::Rect::from_min_size(
        egui::pos2(rect.right() - 140.0, rect.top() + 4.0),
        egui::vec2(136.0, 44.0),
    );
    painter.rect_filled(overlay_rect, 4.0, Color32::from_rgba_premultiplied(0, 0, 0, 140));
    painter.text(
        overlay_rect.min + egui::vec2(6.0, 4.0),
        egui::Align2::LEFT_TOP,
        format!(
            "Dist: {:.1}\nYaw: {:.0}  Pitch: {:.0}",
            camera.distance,
            camera.yaw.to_degrees(),
            camera.pitch.to_degrees(),
        ),
        egui::FontId::monospace(10.0),
        Color32::from_rgb(160, 160, 170),
    );
}
