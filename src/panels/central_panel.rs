use egui::{Color32, Pos2, Rect, Sense, vec2};

use crate::PaintApp;
use crate::input::InputEvent;
use crate::texture_manager::{TextureSlot, to_color_image};

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::both().show(ui, |ui| {
            let persisted = app.engine.persisted();
            let size = vec2(persisted.width() as f32, persisted.height() as f32);
            let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

            let engine = &app.engine;
            let texture = app
                .textures
                .get_or_update(ctx, TextureSlot::Canvas, engine.revision(), || {
                    to_color_image(&engine.composite())
                });
            ui.painter().image(
                texture,
                rect,
                Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );

            // The text field goes first so a click that moves focus away
            // resolves the old entry before the press opens a new one
            text_entry(app, ctx, rect);
            canvas_pointer(app, ui, &response, rect);
        });
    });
}

fn text_entry(app: &mut PaintApp, ctx: &egui::Context, canvas: Rect) {
    let Some(edit) = app.engine.state().text_edit() else {
        app.focused_text_anchor = None;
        return;
    };
    let anchor = edit.anchor;
    let color = edit.settings.fill;
    let font = egui::FontId::proportional(app.engine.config().text_size);
    let needs_focus = app.focused_text_anchor != Some(anchor);

    let event = egui::Area::new(egui::Id::new("text_entry"))
        .fixed_pos(canvas.min + anchor.to_vec2())
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            let buffer = app.engine.text_buffer_mut()?;
            let response = ui.add(
                egui::TextEdit::singleline(buffer)
                    .font(font)
                    .text_color(color)
                    .desired_width(240.0)
                    .hint_text("Type, Enter to place"),
            );
            if needs_focus {
                response.request_focus();
            }
            if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                return Some(InputEvent::TextCancel);
            }
            if response.lost_focus() {
                return Some(if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    InputEvent::TextConfirm
                } else {
                    InputEvent::TextFocusLost
                });
            }
            None
        })
        .inner;

    app.focused_text_anchor = Some(anchor);
    if let Some(event) = event {
        app.engine.handle_input(event);
    }
}

/// Translates raw pointer state into canvas-local press, drag and release.
fn canvas_pointer(app: &mut PaintApp, ui: &egui::Ui, response: &egui::Response, canvas: Rect) {
    let (pressed, down, pointer) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_down(),
            i.pointer.interact_pos(),
        )
    });
    let local = pointer.map(|pos| (pos - canvas.min).to_pos2());

    if pressed && response.hovered() {
        if let Some(position) = local {
            app.engine.handle_input(InputEvent::PointerDown { position });
            app.last_canvas_pos = Some(position);
        }
        return;
    }

    let Some(last) = app.last_canvas_pos else {
        return;
    };
    let position = local.unwrap_or(last);
    if down {
        if position != last {
            app.engine.handle_input(InputEvent::PointerMove { position });
            app.last_canvas_pos = Some(position);
        }
    } else {
        app.engine.handle_input(InputEvent::PointerUp { position });
        app.last_canvas_pos = None;
    }
}
