use egui::{Color32, Rect, Sense, Stroke, pos2, vec2};

use crate::PaintApp;
use crate::color::{ColorRole, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};
use crate::texture_manager::{TextureSlot, to_color_image};

const FULL_UV: Rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));

/// Picker surfaces, sliders and the fill/outline swatches.
pub fn color_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::right("color_panel")
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Color");
            saturation_brightness_panel(app, ui);
            ui.add_space(6.0);
            hue_strip(app, ui);

            ui.separator();
            let mut opacity = app.engine.colors().opacity() * 100.0;
            if ui
                .add(egui::Slider::new(&mut opacity, 0.0..=100.0).suffix(" %").text("Opacity"))
                .changed()
            {
                app.engine.set_opacity(opacity / 100.0);
            }
            let mut width = app.engine.colors().stroke_width();
            let stroke_slider =
                egui::Slider::new(&mut width, MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).text("Stroke");
            if ui.add(stroke_slider).changed() {
                app.engine.set_stroke_width(width);
            }

            ui.separator();
            ui.horizontal(|ui| {
                swatch(app, ui, ColorRole::Fill);
                swatch(app, ui, ColorRole::Outline);
            });
            if app.engine.active_color_role().is_none() {
                ui.weak("Select Fill or Outline to edit it");
            }
        });
}

fn saturation_brightness_panel(app: &mut PaintApp, ui: &mut egui::Ui) {
    let size = app.engine.picker().panel_size() as f32;
    let (rect, response) = ui.allocate_exact_size(vec2(size, size), Sense::click_and_drag());

    let picker = app.engine.picker();
    let texture = app.textures.get_or_update(
        ui.ctx(),
        TextureSlot::SaturationBrightness,
        picker.panel_revision(),
        || to_color_image(&picker.panel_raster()),
    );
    ui.painter().image(texture, rect, FULL_UV, Color32::WHITE);

    if response.is_pointer_button_down_on() {
        if let Some(pos) = response.interact_pointer_pos() {
            let local = pos - rect.min;
            app.engine.pick_saturation_brightness(local.x, local.y);
        }
    }

    let engine = &app.engine;
    let marker = engine
        .picker()
        .panel_indicator(engine.colors(), engine.active_color_role());
    if let Some(marker) = marker {
        let center = rect.min + marker.to_vec2();
        ui.painter().circle_stroke(center, 6.0, Stroke::new(2.0, Color32::WHITE));
        ui.painter().circle_stroke(center, 7.5, Stroke::new(1.0, Color32::BLACK));
    }
}

fn hue_strip(app: &mut PaintApp, ui: &mut egui::Ui) {
    let picker = app.engine.picker();
    let raster = picker.hue_raster();
    let size = vec2(picker.strip_width() as f32, raster.height() as f32);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

    // The strip never changes after construction
    let texture = app
        .textures
        .get_or_update(ui.ctx(), TextureSlot::HueStrip, 0, || to_color_image(raster));
    ui.painter().image(texture, rect, FULL_UV, Color32::WHITE);

    if response.is_pointer_button_down_on() {
        if let Some(pos) = response.interact_pointer_pos() {
            app.engine.pick_hue(pos.x - rect.min.x);
        }
    }

    let engine = &app.engine;
    if let Some(x) = engine.picker().hue_indicator(engine.colors(), engine.active_color_role()) {
        let x = rect.min.x + x;
        ui.painter().line_segment(
            [pos2(x, rect.min.y - 2.0), pos2(x, rect.max.y + 2.0)],
            Stroke::new(3.0, Color32::BLACK),
        );
        ui.painter().line_segment(
            [pos2(x, rect.min.y), pos2(x, rect.max.y)],
            Stroke::new(1.0, Color32::WHITE),
        );
    }
}

/// Clicking a swatch selects its role; clicking the selected one deselects.
fn swatch(app: &mut PaintApp, ui: &mut egui::Ui, role: ColorRole) {
    let selected = app.engine.active_color_role() == Some(role);
    ui.vertical(|ui| {
        let (rect, response) = ui.allocate_exact_size(vec2(48.0, 32.0), Sense::click());
        ui.painter().rect_filled(rect, 4.0, app.engine.colors().rgb(role));
        let border = if selected {
            Stroke::new(3.0, Color32::from_rgb(33, 150, 243))
        } else {
            Stroke::new(1.0, Color32::GRAY)
        };
        ui.painter().rect_stroke(rect, 4.0, border);
        ui.label(role.name());

        if response.clicked() {
            let role = if selected { None } else { Some(role) };
            app.engine.select_color_role(role);
        }
    });
}
