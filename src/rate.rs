//! Frame rate to wait interval conversion.

use std::time::Duration;

use crate::backend::Wait;
use crate::error::{HelperError, Result};

/// Convert a frame rate (frames per second) to whole milliseconds per frame.
///
/// Truncates toward zero, so rates above 1000 fps yield 0.
pub fn fps_to_ms(frame_rate: f64) -> Result<u64> {
    if !frame_rate.is_finite() || frame_rate <= 0.0 {
        return Err(HelperError::InvalidArgument(format!(
            "frame rate must be a positive number, got {}",
            frame_rate
        )));
    }
    Ok((1000.0 / frame_rate).floor() as u64)
}

/// Per-frame wait for a given frame rate.
///
/// A zero interval is a non-blocking poll, not an indefinite wait.
pub fn frame_interval(frame_rate: f64) -> Result<Wait> {
    fps_to_ms(frame_rate).map(|ms| Wait::For(Duration::from_millis(ms)))
}
