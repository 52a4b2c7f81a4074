use egui::pos2;

use crate::canvas::{Bitmap, CanvasSurface, TextRasterizer};
use crate::color::{ColorModel, ColorPickerSurface, ColorRole};
use crate::config::EngineConfig;
use crate::history::HistoryManager;
use crate::input::{InputEvent, resolve_open_gesture, route_event};
use crate::state::EditorState;
use crate::tools::Tool;

/// The drawing engine as the host shell sees it.
///
/// Owns the color model and picker, the canvas buffers, the snapshot history
/// and the editor state. Every call completes synchronously; nothing here
/// fails; bad input is clamped or ignored.
#[derive(Debug)]
pub struct PaintEngine {
    config: EngineConfig,
    colors: ColorModel,
    picker: ColorPickerSurface,
    canvas: CanvasSurface,
    history: HistoryManager,
    state: EditorState,
    /// `None` when no font could be loaded; text entries are then discarded
    text: Option<TextRasterizer>,
}

impl Default for PaintEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PaintEngine {
    pub fn new(config: EngineConfig) -> Self {
        let text = match TextRasterizer::with_default_font() {
            Ok(text) => Some(text),
            Err(err) => {
                log::warn!("Text tool disabled: {err}");
                None
            }
        };
        Self::with_text_rasterizer(config, text)
    }

    pub fn with_text_rasterizer(config: EngineConfig, text: Option<TextRasterizer>) -> Self {
        let config = config.normalized();
        let state = EditorState::default();
        let mut colors = ColorModel::new(config.default_opacity, config.default_stroke_width);
        let picker = ColorPickerSurface::new(&config, &mut colors, state.active_role());
        let canvas =
            CanvasSurface::new(config.canvas_width, config.canvas_height, config.background);
        // The blank canvas is the floor undo returns to
        let history = HistoryManager::new(canvas.snapshot(), config.history_depth);
        log::info!(
            "Engine ready: {}x{} canvas, history depth {}",
            config.canvas_width,
            config.canvas_height,
            config.history_depth
        );

        Self {
            config,
            colors,
            picker,
            canvas,
            history,
            state,
            text,
        }
    }

    /// Persisted content with the in-progress preview on top
    pub fn composite(&self) -> Bitmap {
        self.canvas.composite()
    }

    pub fn set_active_tool(&mut self, tool: Tool) {
        if tool == self.state.active_tool() {
            return;
        }
        self.resolve_open_gesture();
        self.state.set_active_tool(tool);
        log::info!("Active tool: {}", tool.name());
    }

    pub fn active_tool(&self) -> Tool {
        self.state.active_tool()
    }

    /// Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.resolve_open_gesture();
        let Some(snapshot) = self.history.undo() else {
            log::debug!("Nothing to undo");
            return false;
        };
        self.canvas.restore(snapshot);
        log::info!("Undo (redo depth {})", self.history.redo_depth());
        true
    }

    /// Returns `false` when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.resolve_open_gesture();
        let Some(snapshot) = self.history.redo() else {
            log::debug!("Nothing to redo");
            return false;
        };
        self.canvas.restore(snapshot);
        log::info!("Redo (redo depth {})", self.history.redo_depth());
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Choose which color the picker edits; `None` disables picking.
    pub fn select_color_role(&mut self, role: Option<ColorRole>) {
        self.state.set_active_role(role);
        self.picker.sync_role(&self.colors, role);
        log::info!("Active color role: {}", role.map_or("none", |r| r.name()));
    }

    pub fn active_color_role(&self) -> Option<ColorRole> {
        self.state.active_role()
    }

    /// Feed one input event through the gesture state machine.
    ///
    /// Returns `true` when it committed an action to history.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        route_event(
            &event,
            &mut self.state,
            &self.colors,
            &mut self.canvas,
            &mut self.history,
            self.text.as_ref(),
            &self.config,
        )
    }

    pub fn pointer_press(&mut self, x: f32, y: f32) -> bool {
        self.handle_input(InputEvent::PointerDown { position: pos2(x, y) })
    }

    pub fn pointer_drag(&mut self, x: f32, y: f32) -> bool {
        self.handle_input(InputEvent::PointerMove { position: pos2(x, y) })
    }

    pub fn pointer_release(&mut self, x: f32, y: f32) -> bool {
        self.handle_input(InputEvent::PointerUp { position: pos2(x, y) })
    }

    /// The open text field's content, for binding a host text widget
    pub fn text_buffer_mut(&mut self) -> Option<&mut String> {
        self.state.text_edit_mut().map(|edit| &mut edit.buffer)
    }

    pub fn confirm_text(&mut self) -> bool {
        self.handle_input(InputEvent::TextConfirm)
    }

    pub fn cancel_text(&mut self) {
        self.handle_input(InputEvent::TextCancel);
    }

    /// Close an open drag or text field as if the user had finished it.
    pub fn resolve_open_gesture(&mut self) -> bool {
        resolve_open_gesture(
            &mut self.state,
            &mut self.canvas,
            &mut self.history,
            self.text.as_ref(),
            &self.config,
        )
    }

    /// Panel-local pick; ignored when no color role is selected.
    pub fn pick_saturation_brightness(&mut self, x: f32, y: f32) -> bool {
        self.picker
            .pick_saturation_brightness(&mut self.colors, self.state.active_role(), x, y)
    }

    /// Strip-local pick; ignored when no color role is selected.
    pub fn pick_hue(&mut self, x: f32) -> bool {
        self.picker.pick_hue(&mut self.colors, self.state.active_role(), x)
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.colors.set_opacity(opacity);
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.colors.set_stroke_width(width);
    }

    /// Copy of the committed pixels, preview excluded, after closing any
    /// open gesture.
    pub fn snapshot_for_export(&mut self) -> Bitmap {
        self.resolve_open_gesture();
        self.canvas.persisted().clone()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn colors(&self) -> &ColorModel {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut ColorModel {
        &mut self.colors
    }

    pub fn picker(&self) -> &ColorPickerSurface {
        &self.picker
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn persisted(&self) -> &Bitmap {
        self.canvas.persisted()
    }

    pub fn preview(&self) -> &Bitmap {
        self.canvas.preview()
    }

    /// Changes whenever either canvas buffer changes
    pub fn revision(&self) -> u64 {
        self.canvas.revision()
    }

    pub fn has_text_support(&self) -> bool {
        self.text.is_some()
    }
}
