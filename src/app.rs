use std::time::Duration;

use egui::{Key, KeyboardShortcut, Modifiers, Pos2};

use crate::config::EngineConfig;
use crate::engine::PaintEngine;
use crate::export::ExportWorker;
use crate::panels::{central_panel, color_panel, tools_panel, top_panel};
use crate::texture_manager::TextureManager;

/// Environment variable naming a JSON config file that overrides the stored one
pub const CONFIG_ENV: &str = "PAINT_PLUS_CONFIG";

const UNDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);

/// Desktop shell around the engine. Only the engine config is persisted.
pub struct PaintApp {
    pub(crate) engine: PaintEngine,
    pub(crate) textures: TextureManager,
    exporter: ExportWorker,
    pub(crate) export_path: String,
    pub(crate) status: Option<String>,
    /// Canvas-local pointer position while the primary button is held on the canvas
    pub(crate) last_canvas_pos: Option<Pos2>,
    /// Anchor of the text field that has already been given focus
    pub(crate) focused_text_anchor: Option<Pos2>,
}

impl Default for PaintApp {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_config(load_config(cc.storage))
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let export_path = config.export_path.display().to_string();
        Self {
            engine: PaintEngine::new(config),
            textures: TextureManager::new(),
            exporter: ExportWorker::spawn(),
            export_path,
            status: None,
            last_canvas_pos: None,
            focused_text_anchor: None,
        }
    }

    /// Hand the committed pixels to the export worker.
    pub(crate) fn export(&mut self) {
        let bitmap = self.engine.snapshot_for_export();
        self.status = Some(match self.exporter.submit(bitmap, &self.export_path) {
            Ok(path) => format!("Saving {}…", path.display()),
            Err(err) => {
                log::error!("{err}");
                format!("Export failed: {err}")
            }
        });
    }

    fn poll_exports(&mut self, ctx: &egui::Context) {
        while let Some(outcome) = self.exporter.poll() {
            self.status = Some(match outcome.result {
                Ok(()) => format!("Saved {}", outcome.path.display()),
                Err(err) => format!("Export failed: {err}"),
            });
        }
        if self.exporter.pending() > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // The text field keeps its own undo while open
        if self.engine.state().text_edit().is_some() {
            return;
        }
        if ctx.input_mut(|i| i.consume_shortcut(&UNDO)) {
            self.engine.undo();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&REDO)) {
            self.engine.redo();
        }
    }
}

fn load_config(storage: Option<&dyn eframe::Storage>) -> EngineConfig {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        match EngineConfig::load(&path) {
            Ok(config) => return config,
            Err(err) => log::warn!("{err}, using stored config"),
        }
    }
    storage
        .and_then(|storage| eframe::get_value::<EngineConfig>(storage, eframe::APP_KEY))
        .map(EngineConfig::normalized)
        .unwrap_or_default()
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let mut config = self.engine.config().clone();
        config.export_path = self.export_path.clone().into();
        eframe::set_value(storage, eframe::APP_KEY, &config);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_exports(ctx);
        self.handle_shortcuts(ctx);

        top_panel(self, ctx);
        tools_panel(self, ctx);
        color_panel(self, ctx);
        central_panel(self, ctx);
    }
}
