//! Video player: render each frame of a source at a fixed interval.
//!
//! ```text
//! Opening ──▶ Playing ──▶ Stopped      (quit key, Ctrl+C, window closed)
//!                 │
//!                 └────▶ EndOfStream  (no more frames, read error)
//! ```

use crate::backend::{Backend, Capture, Display, Keys, Wait};
use crate::error::{HelperError, Result};
use crate::keys::KeyBindings;
use crate::rate::frame_interval;
use crate::source::open_source;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Opening,
    Playing,
    Stopped,
    EndOfStream,
}

impl PlayerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlayerState::Stopped | PlayerState::EndOfStream)
    }
}

/// Settings for [`play_video`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlayOptions {
    /// Playback rate in frames per second
    pub frame_rate: f64,
    pub bindings: KeyBindings,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            frame_rate: 1000.0,
            bindings: KeyBindings::default(),
        }
    }
}

/// How playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackReport {
    pub state: PlayerState,
    /// Frames rendered
    pub frames: u64,
}

/// Play the source named by `source_id` (device index or file path).
///
/// The window is titled with `source_id`. The capture is released exactly
/// once on every path after it was opened.
///
/// # Errors
/// * `HelperError::InvalidArgument` - non-positive frame rate
/// * `HelperError::SourceUnavailable` - the source could not be opened
/// * Any render error other than the window being closed
pub fn play_video<B, D, K>(
    backend: &mut B,
    display: &mut D,
    keys: &mut K,
    source_id: &str,
    options: &PlayOptions,
) -> Result<PlaybackReport>
where
    B: Backend,
    D: Display,
    K: Keys,
{
    let interval = frame_interval(options.frame_rate)?;

    let mut capture = open_source(backend, source_id)?;
    log::info!(
        "Playing {} at {} fps (press '{}' to quit)",
        source_id,
        options.frame_rate,
        options.bindings.quit
    );

    let result = run_playback(&mut capture, display, keys, source_id, interval, &options.bindings);
    capture.release();

    if let Ok(report) = &result {
        log::info!("Playback {:?} after {} frames", report.state, report.frames);
    }
    result
}

fn run_playback<C, D, K>(
    capture: &mut C,
    display: &mut D,
    keys: &mut K,
    title: &str,
    interval: Wait,
    bindings: &KeyBindings,
) -> Result<PlaybackReport>
where
    C: Capture,
    D: Display,
    K: Keys,
{
    let mut state = PlayerState::Playing;
    let mut frames = 0;

    while !state.is_terminal() {
        let frame = match capture.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                state = PlayerState::EndOfStream;
                continue;
            }
            Err(e) => {
                log::warn!("Frame read failed, ending playback: {}", e);
                state = PlayerState::EndOfStream;
                continue;
            }
        };

        match display.show(title, &frame) {
            Ok(()) => frames += 1,
            Err(HelperError::WindowClosed) => {
                state = PlayerState::Stopped;
                continue;
            }
            Err(e) => return Err(e),
        }

        if bindings.is_quit(keys.wait_key(interval)) {
            state = PlayerState::Stopped;
        }
    }

    Ok(PlaybackReport { state, frames })
}
