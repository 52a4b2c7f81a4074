use egui::Color32;

use crate::color::{ColorModel, ColorRole};

mod shape;
pub use shape::{Shape, ShapeKind};

/// The drawing tools. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Pencil,
    Rectangle,
    Circle,
    Triangle,
    Eraser,
    Text,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Pencil,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Triangle,
        Tool::Eraser,
        Tool::Text,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pencil => "Pencil",
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Triangle => "Triangle",
            Self::Eraser => "Eraser",
            Self::Text => "Text",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Pencil => "✏",
            Self::Rectangle => "⬜",
            Self::Circle => "⭕",
            Self::Triangle => "△",
            Self::Eraser => "⌫",
            Self::Text => "T",
        }
    }

    /// Shape drawn by drag-to-size tools
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Circle => Some(ShapeKind::Circle),
            Self::Triangle => Some(ShapeKind::Triangle),
            _ => None,
        }
    }
}

/// Rendering parameters captured when a gesture starts.
///
/// Later color or slider changes never reach an action already under way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub fill: Color32,
    pub outline: Color32,
    pub opacity: f32,
    pub stroke_width: f32,
}

impl RenderSettings {
    pub fn capture(colors: &ColorModel) -> Self {
        Self {
            fill: colors.rgb(ColorRole::Fill),
            outline: colors.rgb(ColorRole::Outline),
            opacity: colors.opacity(),
            stroke_width: colors.stroke_width(),
        }
    }
}
