//! Source resolution: device index or file path.

use std::fmt;
use std::path::PathBuf;

use crate::backend::Backend;
use crate::error::{HelperError, Result};

/// A video source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Capture device by index (webcam 0, 1, ...)
    Device(u32),
    /// Video file on disk
    File(PathBuf),
}

impl Source {
    /// Resolve a textual source identifier.
    ///
    /// A non-empty string made only of ASCII digits is a device index,
    /// anything else is a file path.
    pub fn parse(id: &str) -> Result<Self> {
        if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
            let index = id.parse::<u32>().map_err(|e| HelperError::SourceUnavailable {
                source_id: id.to_string(),
                reason: format!("invalid device index: {}", e),
            })?;
            return Ok(Source::Device(index));
        }
        Ok(Source::File(PathBuf::from(id)))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Device(index) => write!(f, "device {}", index),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolve `id` and open it through `backend`.
///
/// Fails fast with [`HelperError::SourceUnavailable`] when the source cannot
/// be opened; nothing is acquired in that case.
pub fn open_source<B: Backend>(backend: &mut B, id: &str) -> Result<B::Capture> {
    let source = Source::parse(id)?;
    log::debug!("Opening {}", source);

    match backend.open_capture(&source) {
        Ok(capture) => Ok(capture),
        Err(HelperError::SourceUnavailable { source_id, reason }) => {
            log::error!("Error opening video source {}: {}", source_id, reason);
            Err(HelperError::SourceUnavailable { source_id, reason })
        }
        Err(e) => {
            log::error!("Error opening video source {}: {}", source, e);
            Err(HelperError::SourceUnavailable {
                source_id: id.to_string(),
                reason: e.to_string(),
            })
        }
    }
}
