//! Error types shared by the viewer, player and recorder.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::ffmpeg::PipelineError;

/// Errors that can occur while viewing, playing or recording.
#[derive(Debug, thiserror::Error)]
pub enum HelperError {
    /// The capture source could not be opened
    #[error("Source '{source_id}' unavailable: {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    /// A still image or frame could not be decoded
    #[error("Failed to decode '{}': {reason}", path.display())]
    DecodeFailed { path: PathBuf, reason: String },

    /// An argument was out of its valid range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The output encoder failed to open or accept a frame
    #[error("Encoder error: {0}")]
    Encoder(String),

    /// The display window failed to render a frame
    #[error("Display error: {0}")]
    Display(String),

    /// The user closed the display window
    #[error("Display window was closed")]
    WindowClosed,

    #[error(transparent)]
    Ffmpeg(#[from] PipelineError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, HelperError>;
