//! Capability traits the viewer, player and recorder are written against.
//!
//! The procedures never touch FFmpeg directly. They receive a [`Backend`]
//! that opens captures and encoders, a [`Display`] that renders frames, and
//! a [`Keys`] source that waits for key presses. The FFmpeg implementations
//! live in [`crate::ffmpeg`] and [`crate::keys`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::codec::Fourcc;
use crate::error::Result;
use crate::frame::{Frame, FrameSize};
use crate::source::Source;

/// How long a key wait may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Block until a key arrives
    Forever,
    /// Block at most this long; zero polls once
    For(Duration),
}

/// A key event delivered to a waiting procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Char(char),
    /// Ctrl+C
    Interrupt,
}

/// An open video source.
pub trait Capture {
    /// Frame size reported by the source when it was opened.
    fn frame_size(&self) -> FrameSize;

    /// Nominal frame rate, if the source reports one.
    fn frame_rate(&self) -> Option<f64>;

    /// Read the next frame. `Ok(None)` means end of stream.
    fn read(&mut self) -> Result<Option<Frame>>;

    /// Release the underlying resource. Safe to call more than once.
    fn release(&mut self);
}

/// An open output stream.
pub trait Encoder {
    fn write(&mut self, frame: &Frame) -> Result<()>;

    /// Flush and close the output. Safe to call more than once.
    fn release(&mut self) -> Result<()>;
}

/// Parameters for opening an [`Encoder`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderSettings {
    pub path: PathBuf,
    pub size: FrameSize,
    pub frame_rate: f64,
    pub fourcc: Fourcc,
}

/// Factory for captures, encoders and still images.
pub trait Backend {
    type Capture: Capture;
    type Encoder: Encoder;

    /// Open a source. `Ok` means the capture is open and must be released.
    fn open_capture(&mut self, source: &Source) -> Result<Self::Capture>;

    fn open_encoder(&mut self, settings: &EncoderSettings) -> Result<Self::Encoder>;

    /// Decode a single still image.
    fn read_image(&mut self, path: &Path) -> Result<Frame>;
}

/// Render sink for frames.
pub trait Display {
    /// Render `frame` in the window named `title`.
    ///
    /// Returns [`crate::HelperError::WindowClosed`] if the user closed the window.
    fn show(&mut self, title: &str, frame: &Frame) -> Result<()>;

    /// Close every window opened by this display.
    fn close_all(&mut self);
}

/// Source of key presses.
pub trait Keys {
    /// Wait up to `wait` for a key. `None` means the wait elapsed.
    fn wait_key(&mut self, wait: Wait) -> Option<KeyPress>;
}
