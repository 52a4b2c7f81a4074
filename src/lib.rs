#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod color;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod history;
pub mod input;
pub mod panels;
pub mod state;
pub mod texture_manager;
pub mod tools;

pub use app::PaintApp;
pub use canvas::{Bitmap, CanvasSurface, DrawOp};
pub use color::{ColorModel, ColorPickerSurface, ColorRole, ColorState};
pub use config::EngineConfig;
pub use engine::PaintEngine;
pub use error::{EngineError, EngineResult};
pub use export::{ExportOutcome, ExportWorker};
pub use history::{CanvasSnapshot, HistoryManager};
pub use input::InputEvent;
pub use state::{EditorState, Gesture};
pub use tools::{RenderSettings, Shape, ShapeKind, Tool};
