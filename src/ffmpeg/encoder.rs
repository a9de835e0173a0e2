//! Video file output through an `ffmpeg` encode pipe.

use std::io::{self, Write};
use std::path::PathBuf;

use super::pipeline::{PipeMode, Pipeline};
use crate::backend::{Encoder, EncoderSettings};
use crate::config::ToolsConfig;
use crate::error::{HelperError, Result};
use crate::frame::{Frame, FrameSize, PixelFormat};

/// Build the ffmpeg arguments that encode raw BGR24 from stdin.
pub fn encoder_args(settings: &EncoderSettings) -> Result<Vec<String>> {
    if settings.size.is_empty() {
        return Err(HelperError::InvalidArgument(format!(
            "cannot encode frames of size {}",
            settings.size
        )));
    }
    if !settings.frame_rate.is_finite() || settings.frame_rate <= 0.0 {
        return Err(HelperError::InvalidArgument(format!(
            "encoder frame rate must be positive, got {}",
            settings.frame_rate
        )));
    }

    let mut args: Vec<String> = vec![
        "-v".into(),
        "error".into(),
        "-y".into(),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        PixelFormat::Bgr24.ffmpeg_name().into(),
        "-s".into(),
        settings.size.to_string(),
        "-r".into(),
        settings.frame_rate.to_string(),
        "-i".into(),
        "-".into(),
    ];
    args.extend(settings.fourcc.to_ffmpeg_args()?);
    args.push(settings.path.to_string_lossy().into_owned());
    Ok(args)
}

/// Writes frames to a video file via an `ffmpeg` child process.
#[derive(Debug)]
pub struct FfmpegEncoder {
    path: PathBuf,
    size: FrameSize,
    pipeline: Option<Pipeline>,
    frames_written: u64,
}

impl FfmpegEncoder {
    pub fn open(tools: &ToolsConfig, settings: &EncoderSettings) -> Result<Self> {
        let args = encoder_args(settings)?;
        let pipeline = Pipeline::spawn(&tools.ffmpeg, &args, PipeMode::Write)?;

        log::info!(
            "Recording to {} ({} @ {} fps, {})",
            settings.path.display(),
            settings.size,
            settings.frame_rate,
            settings.fourcc
        );

        Ok(Self {
            path: settings.path.clone(),
            size: settings.size,
            pipeline: Some(pipeline),
            frames_written: 0,
        })
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl Encoder for FfmpegEncoder {
    fn write(&mut self, frame: &Frame) -> Result<()> {
        if frame.size != self.size {
            return Err(HelperError::Encoder(format!(
                "frame size {} does not match encoder size {}",
                frame.size, self.size
            )));
        }

        let stdin = self
            .pipeline
            .as_mut()
            .and_then(|p| p.stdin())
            .ok_or_else(|| HelperError::Encoder("encoder already released".to_string()))?;

        match stdin.write_all(&frame.data) {
            Ok(()) => {
                self.frames_written += 1;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                let (program, stderr) = self
                    .pipeline
                    .as_mut()
                    .map(|p| {
                        let _ = p.wait();
                        (p.program().to_string(), p.take_stderr_output().join("\n"))
                    })
                    .unwrap_or_default();
                Err(HelperError::Encoder(format!(
                    "{} stopped accepting frames for {}: {}",
                    program,
                    self.path.display(),
                    stderr
                )))
            }
            Err(e) => Err(HelperError::Encoder(e.to_string())),
        }
    }

    fn release(&mut self) -> Result<()> {
        let Some(mut pipeline) = self.pipeline.take() else {
            return Ok(());
        };
        log::debug!(
            "Finalizing {} after {} frames",
            self.path.display(),
            self.frames_written
        );
        pipeline
            .finish()
            .map_err(|e| HelperError::Encoder(e.to_string()))
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("{}", e);
        }
    }
}
