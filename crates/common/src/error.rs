//! Error types shared across bowsync crates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level error type for bowsync operations.
#[derive(Debug, thiserror::Error)]
pub enum BowsyncError {
    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },

    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Empty input: {message}")]
    EmptyInput { message: String },

    #[error("Alignment error: {message}")]
    Alignment { message: String },

    #[error("Audio error: {message}")]
    Audio { message: String },

    #[error("Resource error: {message}")]
    Resource { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using BowsyncError.
pub type BowsyncResult<T> = Result<T, BowsyncError>;

/// How a failure affects the unit of work that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Bad or insufficient trajectory/audio data. Aborts the unit.
    Input,
    /// The two streams share no frame range. The unit's output is empty.
    Alignment,
    /// Missing file, unreadable audio, bad configuration. Aborts the unit.
    Resource,
}

impl BowsyncError {
    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Self::InsufficientData {
            message: msg.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: msg.into(),
        }
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput {
            message: msg.into(),
        }
    }

    pub fn alignment(msg: impl Into<String>) -> Self {
        Self::Alignment {
            message: msg.into(),
        }
    }

    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio {
            message: msg.into(),
        }
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Classify this error for per-unit isolation in batch runs.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InsufficientData { .. } | Self::MalformedInput { .. } | Self::EmptyInput { .. } => {
                ErrorClass::Input
            }
            Self::Alignment { .. } => ErrorClass::Alignment,
            _ => ErrorClass::Resource,
        }
    }

    /// Whether the unit that raised this error should still be considered
    /// processed (its output is simply empty).
    pub fn is_fatal_to_unit(&self) -> bool {
        self.class() != ErrorClass::Alignment
    }
}
