use egui::Pos2;

use crate::color::ColorRole;
use crate::tools::{RenderSettings, Tool};

/// A press-drag-release action in progress
#[derive(Debug, Clone, PartialEq)]
pub struct DragAction {
    pub tool: Tool,
    pub anchor: Pos2,
    /// Most recent recorded pointer position
    pub last: Pos2,
    /// Distinct positions recorded so far, the anchor included
    pub points: usize,
    pub settings: RenderSettings,
}

impl DragAction {
    pub fn new(tool: Tool, anchor: Pos2, settings: RenderSettings) -> Self {
        Self {
            tool,
            anchor,
            last: anchor,
            points: 1,
            settings,
        }
    }

    /// Record a pointer sample. Returns the previous position when the
    /// pointer actually moved.
    pub fn advance(&mut self, pos: Pos2) -> Option<Pos2> {
        if pos == self.last {
            return None;
        }
        let previous = std::mem::replace(&mut self.last, pos);
        self.points += 1;
        Some(previous)
    }
}

/// An open inline text field
#[derive(Debug, Clone, PartialEq)]
pub struct TextEdit {
    pub anchor: Pos2,
    pub settings: RenderSettings,
    pub buffer: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragAction),
    TextEditing(TextEdit),
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Dragging(_) => "Dragging",
            Self::TextEditing(_) => "TextEditing",
        }
    }
}

/// Everything the input handler mutates besides pixels: the active tool,
/// the selected color role and the gesture in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    active_tool: Tool,
    active_role: Option<ColorRole>,
    pub(crate) gesture: Gesture,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            active_tool: Tool::default(),
            active_role: Some(ColorRole::Fill),
            gesture: Gesture::Idle,
        }
    }
}

impl EditorState {
    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    /// Callers must resolve the open gesture first
    pub(crate) fn set_active_tool(&mut self, tool: Tool) {
        self.active_tool = tool;
    }

    pub fn active_role(&self) -> Option<ColorRole> {
        self.active_role
    }

    pub fn set_active_role(&mut self, role: Option<ColorRole>) {
        self.active_role = role;
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    pub fn text_edit(&self) -> Option<&TextEdit> {
        match &self.gesture {
            Gesture::TextEditing(edit) => Some(edit),
            _ => None,
        }
    }

    pub fn text_edit_mut(&mut self) -> Option<&mut TextEdit> {
        match &mut self.gesture {
            Gesture::TextEditing(edit) => Some(edit),
            _ => None,
        }
    }

    /// Leave whatever gesture was open, handing it back to the caller
    pub(crate) fn take_gesture(&mut self) -> Gesture {
        std::mem::take(&mut self.gesture)
    }
}
