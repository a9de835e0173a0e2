//! cv-helper library crate.
//!
//! Image viewing, video playback and video recording on top of the FFmpeg
//! command-line tools. The procedures in [`viewer`], [`player`] and
//! [`recorder`] are written against the traits in [`backend`], so any
//! capture, encoder, display or key source can be substituted.

pub mod backend;
pub mod codec;
pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod frame;
pub mod keys;
pub mod player;
pub mod rate;
pub mod recorder;
pub mod source;
pub mod viewer;

pub use backend::{Backend, Capture, Display, Encoder, EncoderSettings, KeyPress, Keys, Wait};
pub use error::{HelperError, Result};
pub use frame::{Frame, FrameSize, PixelFormat};
pub use source::Source;
