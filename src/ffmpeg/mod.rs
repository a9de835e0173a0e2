//! FFmpeg-backed implementations of the capability traits.
//!
//! - [`FfmpegBackend`] opens captures (`ffmpeg` decode pipe), encoders
//!   (`ffmpeg` encode pipe) and still images
//! - [`FfplayDisplay`] renders frames in `ffplay` windows
//! - [`probe`] queries stream properties with `ffprobe`

mod capture;
mod display;
mod encoder;
mod image;
mod pipeline;
mod probe;

use std::path::Path;

pub use capture::{input_args, FfmpegCapture};
pub use display::FfplayDisplay;
pub use encoder::FfmpegEncoder;
pub use pipeline::{PipeMode, Pipeline, PipelineError};
pub use probe::{probe, ProbeError, Rotation, StreamInfo};

use crate::backend::{Backend, EncoderSettings};
use crate::config::ToolsConfig;
use crate::error::Result;
use crate::frame::Frame;
use crate::source::Source;

/// [`Backend`] that drives the FFmpeg command-line tools.
#[derive(Debug, Clone, Default)]
pub struct FfmpegBackend {
    tools: ToolsConfig,
}

impl FfmpegBackend {
    pub fn new(tools: ToolsConfig) -> Self {
        Self { tools }
    }
}

impl Backend for FfmpegBackend {
    type Capture = FfmpegCapture;
    type Encoder = FfmpegEncoder;

    fn open_capture(&mut self, source: &Source) -> Result<FfmpegCapture> {
        FfmpegCapture::open(&self.tools, source)
    }

    fn open_encoder(&mut self, settings: &EncoderSettings) -> Result<FfmpegEncoder> {
        FfmpegEncoder::open(&self.tools, settings)
    }

    fn read_image(&mut self, path: &Path) -> Result<Frame> {
        image::read_image(&self.tools, path)
    }
}
