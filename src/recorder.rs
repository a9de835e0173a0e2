//! Video recorder: copy each frame of a source into an encoded file.
//!
//! ```text
//! Opening ──▶ Recording ──▶ Stopped      (stop key, Ctrl+C, window closed)
//!                  │
//!                  └──────▶ EndOfStream  (no more frames, read error)
//! ```

use std::path::PathBuf;

use crate::backend::{Backend, Capture, Display, Encoder, EncoderSettings, Keys, Wait};
use crate::codec::Fourcc;
use crate::error::{HelperError, Result};
use crate::frame::FrameSize;
use crate::keys::KeyBindings;
use crate::rate::frame_interval;
use crate::source::open_source;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Opening,
    Recording,
    Stopped,
    EndOfStream,
}

impl RecorderState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecorderState::Stopped | RecorderState::EndOfStream)
    }
}

/// Settings for [`record_video`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOptions {
    pub save_path: PathBuf,
    /// Output rate in frames per second; also paces the loop
    pub frame_rate: f64,
    pub fourcc: Fourcc,
    /// Render frames while recording
    pub display: bool,
    pub bindings: KeyBindings,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("output.mp4"),
            frame_rate: 1000.0,
            fourcc: Fourcc::MP4V,
            display: false,
            bindings: KeyBindings::default(),
        }
    }
}

/// How recording ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingReport {
    pub state: RecorderState,
    /// Frames written to the encoder
    pub frames: u64,
    /// Frame size the encoder was opened with
    pub size: FrameSize,
    pub output: PathBuf,
}

/// Record the source named by `source_id` into `options.save_path`.
///
/// The encoder is sized from the capture's reported frame size. Both
/// handles are released exactly once on every path after they were
/// acquired; an encoder that fails to open leaves only the capture to release.
///
/// # Errors
/// * `HelperError::InvalidArgument` - non-positive frame rate or unsupported fourcc
/// * `HelperError::SourceUnavailable` - the source could not be opened
/// * `HelperError::Encoder` - the output could not be opened, written or finalized
pub fn record_video<B, D, K>(
    backend: &mut B,
    display: &mut D,
    keys: &mut K,
    source_id: &str,
    options: &RecordOptions,
) -> Result<RecordingReport>
where
    B: Backend,
    D: Display,
    K: Keys,
{
    let interval = frame_interval(options.frame_rate)?;

    let mut capture = open_source(backend, source_id)?;
    let size = capture.frame_size();

    let settings = EncoderSettings {
        path: options.save_path.clone(),
        size,
        frame_rate: options.frame_rate,
        fourcc: options.fourcc,
    };
    let mut encoder = match backend.open_encoder(&settings) {
        Ok(encoder) => encoder,
        Err(e) => {
            capture.release();
            return Err(e);
        }
    };
    log::info!(
        "Recording {} to {} (press '{}' to stop)",
        source_id,
        options.save_path.display(),
        options.bindings.stop
    );

    let mut session = Session {
        capture: &mut capture,
        encoder: &mut encoder,
        display,
        keys,
        title: source_id,
        interval,
        options,
    };
    let result = session.run();

    let finalized = encoder.release();
    capture.release();

    let (state, frames) = result?;
    finalized?;

    log::info!(
        "Recording {:?} after {} frames, saved {}",
        state,
        frames,
        options.save_path.display()
    );
    Ok(RecordingReport {
        state,
        frames,
        size,
        output: options.save_path.clone(),
    })
}

struct Session<'a, C, E, D, K> {
    capture: &'a mut C,
    encoder: &'a mut E,
    display: &'a mut D,
    keys: &'a mut K,
    title: &'a str,
    interval: Wait,
    options: &'a RecordOptions,
}

impl<C, E, D, K> Session<'_, C, E, D, K>
where
    C: Capture,
    E: Encoder,
    D: Display,
    K: Keys,
{
    fn run(&mut self) -> Result<(RecorderState, u64)> {
        let mut state = RecorderState::Recording;
        let mut frames = 0;

        while !state.is_terminal() {
            state = self.step(&mut frames)?;
        }
        Ok((state, frames))
    }

    /// Read, write, optionally render, then wait for a key.
    fn step(&mut self, frames: &mut u64) -> Result<RecorderState> {
        let frame = match self.capture.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(RecorderState::EndOfStream),
            Err(e) => {
                log::warn!("Frame read failed, ending recording: {}", e);
                return Ok(RecorderState::EndOfStream);
            }
        };

        self.encoder.write(&frame)?;
        *frames += 1;

        if self.options.display {
            match self.display.show(self.title, &frame) {
                Ok(()) => {}
                Err(HelperError::WindowClosed) => return Ok(RecorderState::Stopped),
                Err(e) => return Err(e),
            }
        }

        if self.options.bindings.is_stop(self.keys.wait_key(self.interval)) {
            return Ok(RecorderState::Stopped);
        }
        Ok(RecorderState::Recording)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!RecorderState::Opening.is_terminal());
        assert!(!RecorderState::Recording.is_terminal());
        assert!(RecorderState::Stopped.is_terminal());
        assert!(RecorderState::EndOfStream.is_terminal());
    }

    #[test]
    fn test_default_options() {
        let options = RecordOptions::default();
        assert_eq!(options.save_path, PathBuf::from("output.mp4"));
        assert_eq!(options.fourcc, Fourcc::MP4V);
        assert!(!options.display);
        assert_eq!(options.bindings.stop, 's');
    }
}
