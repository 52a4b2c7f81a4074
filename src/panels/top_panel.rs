use crate::PaintApp;

pub fn top_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Paint+");
            ui.separator();

            let can_undo = app.engine.can_undo();
            let can_redo = app.engine.can_redo();
            if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                app.engine.undo();
            }
            if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                app.engine.redo();
            }

            ui.separator();
            ui.label("Save as:");
            ui.add(egui::TextEdit::singleline(&mut app.export_path).desired_width(180.0));
            if ui.button("Export PNG").clicked() {
                app.export();
            }

            if let Some(status) = &app.status {
                ui.separator();
                ui.label(status);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let history = app.engine.history();
                ui.label(format!(
                    "History {}/{} (redo {})",
                    history.undo_depth(),
                    history.max_depth(),
                    history.redo_depth()
                ));
            });
        });
    });
}
