use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the engine's few fallible edges: configuration,
/// fonts and export. Drawing itself never fails.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("no font available for text rendering")]
    FontUnavailable,
    #[error("invalid font data: {0}")]
    FontData(#[from] ab_glyph::InvalidFont),
    #[error("failed to export image to {path}: {source}")]
    Export {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("export worker is no longer running")]
    ExportWorkerGone,
}

pub type EngineResult<T> = Result<T, EngineError>;
