//! Error types shared across Eyeline crates.

use std::path::PathBuf;

use eyeline_overlay_model::ModelError;

/// Top-level error type for Eyeline operations.
#[derive(Debug, thiserror::Error)]
pub enum EyelineError {
    #[error("Model loading error: {message}")]
    ModelLoad { message: String },

    #[error("Detection error: {message}")]
    Detection { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Degenerate landmarks: {message}")]
    DegenerateLandmarks { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using EyelineError.
pub type EyelineResult<T> = Result<T, EyelineError>;

impl EyelineError {
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad {
            message: msg.into(),
        }
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateLandmarks {
            message: msg.into(),
        }
    }
}
