//! Keyboard shortcut handling

use eframe::egui;

use crate::state::ViewerSession;

/// Handle keyboard shortcuts for the viewer
pub fn handle_keyboard(ctx: &egui::Context, session: &mut ViewerSession) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    ctx.input(|i| {
        // Ctrl+Z undo
        if i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift {
            session.undo();
        }
        // Ctrl+Shift+Z or Ctrl+Y redo
        if (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
            || (i.modifiers.command && i.key_pressed(egui::Key::Y))
        {
            session.redo();
        }
        // Escape drops the pending point and the delete selection
        if i.key_pressed(egui::Key::Escape) {
            session.cancel();
        }
        // Delete removes the selected dimension
        if i.key_pressed(egui::Key::Delete) {
            session.delete_selected();
        }
    });
}
