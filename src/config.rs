use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest glyph size the text tool renders, in pixels
pub const MAX_TEXT_SIZE: f32 = 1000.0;

/// Tunables for the drawing engine and its picker surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct EngineConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// RGBA fill of a blank canvas, also what the eraser clears to
    pub background: [u8; 4],
    /// Maximum number of snapshots kept by the history
    pub history_depth: usize,
    /// Side length of the saturation/brightness panel
    pub panel_size: u32,
    pub hue_strip_width: u32,
    pub hue_strip_height: u32,
    pub text_size: f32,
    /// Shapes narrower or shorter than this are discarded on release
    pub min_shape_extent: f32,
    pub default_stroke_width: f32,
    pub default_opacity: f32,
    pub export_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            background: [255, 255, 255, 255],
            history_depth: 50,
            panel_size: 220,
            hue_strip_width: 220,
            hue_strip_height: 24,
            text_size: 18.0,
            min_shape_extent: 1.0,
            default_stroke_width: 5.0,
            default_opacity: 1.0,
            export_path: PathBuf::from("painting.png"),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded engine config from {}", path.display());
        Self::from_json(&json)
    }

    /// Replaces values the engine cannot work with by the nearest usable ones.
    pub fn normalized(mut self) -> Self {
        self.canvas_width = self.canvas_width.max(1);
        self.canvas_height = self.canvas_height.max(1);
        self.history_depth = self.history_depth.max(1);
        // Rendering divides by (side - 1)
        self.panel_size = self.panel_size.max(2);
        self.hue_strip_width = self.hue_strip_width.max(2);
        self.hue_strip_height = self.hue_strip_height.max(1);
        if !self.text_size.is_finite() || self.text_size < 1.0 {
            self.text_size = 18.0;
        }
        self.text_size = self.text_size.min(MAX_TEXT_SIZE);
        if !self.min_shape_extent.is_finite() || self.min_shape_extent < 0.0 {
            self.min_shape_extent = 1.0;
        }
        self
    }
}
