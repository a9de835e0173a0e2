//! Frame capture from files and devices through an `ffmpeg` decode pipe.

use std::io::{self, Read};

use super::pipeline::{PipeMode, Pipeline, PipelineError};
use super::probe::{probe, StreamInfo};
use crate::backend::Capture;
use crate::config::ToolsConfig;
use crate::error::{HelperError, Result};
use crate::frame::{Frame, FrameSize, PixelFormat};
use crate::source::Source;

/// FFmpeg input arguments for a source.
pub fn input_args(source: &Source) -> Vec<String> {
    match source {
        Source::File(path) => vec!["-i".to_string(), path.to_string_lossy().into_owned()],
        Source::Device(index) => device_input_args(*index),
    }
}

#[cfg(target_os = "linux")]
fn device_input_args(index: u32) -> Vec<String> {
    vec![
        "-f".to_string(),
        "v4l2".to_string(),
        "-i".to_string(),
        format!("/dev/video{}", index),
    ]
}

#[cfg(target_os = "macos")]
fn device_input_args(index: u32) -> Vec<String> {
    // avfoundation refuses to open most cameras without an explicit rate
    vec![
        "-f".to_string(),
        "avfoundation".to_string(),
        "-framerate".to_string(),
        "30".to_string(),
        "-i".to_string(),
        format!("{}:none", index),
    ]
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn device_input_args(index: u32) -> Vec<String> {
    vec![
        "-f".to_string(),
        "vfwcap".to_string(),
        "-i".to_string(),
        index.to_string(),
    ]
}

/// ffmpeg arguments that decode `input` to upright BGR24, up to the output.
///
/// Autorotation is disabled and any rotation found by the probe is applied
/// with an explicit filter, so frames always match `info.size`.
pub(super) fn decode_args(input: Vec<String>, info: &StreamInfo) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-v".into(),
        "error".into(),
        "-nostdin".into(),
        "-noautorotate".into(),
    ];
    args.extend(input);
    args.extend(["-map".to_string(), "0:v:0".to_string()]);
    if let Some(filter) = info.rotation.filter() {
        args.extend(["-vf".to_string(), filter.to_string()]);
    }
    args.extend(
        ["-f", "rawvideo", "-pix_fmt", PixelFormat::Bgr24.ffmpeg_name()]
            .iter()
            .map(|s| s.to_string()),
    );
    args
}

/// A source decoded to BGR24 frames by an `ffmpeg` child process.
#[derive(Debug)]
pub struct FfmpegCapture {
    source: Source,
    info: StreamInfo,
    pipeline: Option<Pipeline>,
    frames_read: u64,
}

impl FfmpegCapture {
    /// Probe and open `source`.
    ///
    /// # Errors
    /// * `HelperError::SourceUnavailable` - missing file, unprobeable input,
    ///   or ffmpeg failed to start
    pub fn open(tools: &ToolsConfig, source: &Source) -> Result<Self> {
        let unavailable = |reason: String| HelperError::SourceUnavailable {
            source_id: source.to_string(),
            reason,
        };

        if let Source::File(path) = source {
            if !path.is_file() {
                return Err(unavailable("no such file".to_string()));
            }
        }

        let input = input_args(source);
        let info = probe(&tools.ffprobe, &input).map_err(|e| unavailable(e.to_string()))?;

        let mut args = decode_args(input, &info);
        args.push("-".to_string());

        let pipeline = Pipeline::spawn(&tools.ffmpeg, &args, PipeMode::Read)
            .map_err(|e| unavailable(e.to_string()))?;

        log::info!("Opened {} ({})", source, info.size);

        Ok(Self {
            source: source.clone(),
            info,
            pipeline: Some(pipeline),
            frames_read: 0,
        })
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    pub fn is_opened(&self) -> bool {
        self.pipeline.is_some()
    }
}

impl Capture for FfmpegCapture {
    fn frame_size(&self) -> FrameSize {
        self.info.size
    }

    fn frame_rate(&self) -> Option<f64> {
        self.info.frame_rate
    }

    fn read(&mut self) -> Result<Option<Frame>> {
        let size = self.info.size;
        let Some(stdout) = self.pipeline.as_mut().and_then(|p| p.stdout()) else {
            return Ok(None);
        };

        let mut data = vec![0u8; size.frame_len(PixelFormat::Bgr24)];
        match stdout.read_exact(&mut data) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                log::debug!(
                    "End of stream for {} after {} frames",
                    self.source,
                    self.frames_read
                );
                return Ok(None);
            }
            Err(e) => return Err(PipelineError::Io(e).into()),
        }

        self.frames_read += 1;
        Ok(Frame::from_bgr(size, data))
    }

    fn release(&mut self) {
        if let Some(mut pipeline) = self.pipeline.take() {
            log::debug!("Releasing capture {}", self.source);
            if let Err(e) = pipeline.shutdown() {
                log::warn!("Failed to stop {}: {}", pipeline.program(), e);
            }
        }
    }
}

impl Drop for FfmpegCapture {
    fn drop(&mut self) {
        self.release();
    }
}
