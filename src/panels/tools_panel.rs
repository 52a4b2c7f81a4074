use crate::PaintApp;
use crate::components::ToolButton;
use crate::tools::Tool;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .exact_width(56.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                let active = app.engine.active_tool();
                for tool in Tool::ALL {
                    if ToolButton::new(tool, tool == active).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.name());
                        app.engine.set_active_tool(tool);
                    }
                    ui.add_space(4.0);
                }
            });
        });
}
