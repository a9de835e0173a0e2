//! Stream property queries via `ffprobe`.

use serde::Deserialize;

use super::pipeline::{run_to_output, PipelineError};
use crate::frame::FrameSize;

/// Clockwise rotation a player applies to show a stream upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Half,
    Clockwise270,
}

impl Rotation {
    /// Snap a clockwise angle in degrees to the nearest quarter turn.
    pub fn from_degrees(clockwise: f64) -> Self {
        let quarters = (clockwise / 90.0).round() as i64;
        match quarters.rem_euclid(4) {
            1 => Rotation::Clockwise90,
            2 => Rotation::Half,
            3 => Rotation::Clockwise270,
            _ => Rotation::None,
        }
    }

    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }

    /// Video filter that turns stored frames upright.
    pub fn filter(&self) -> Option<&'static str> {
        match self {
            Rotation::None => None,
            Rotation::Clockwise90 => Some("transpose=clock"),
            Rotation::Half => Some("hflip,vflip"),
            Rotation::Clockwise270 => Some("transpose=cclock"),
        }
    }
}

/// Properties of the first video stream of an input.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    /// Upright frame size, after `rotation` is applied
    pub size: FrameSize,
    /// Frames per second, when the container declares one
    pub frame_rate: Option<f64>,
    pub rotation: Rotation,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    #[serde(default)]
    tags: ProbeTags,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeTags {
    /// Legacy MP4/MOV rotation tag, clockwise degrees
    rotate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    /// Display matrix rotation, counter-clockwise degrees
    rotation: Option<f64>,
}

impl ProbeStream {
    fn rotation(&self) -> Rotation {
        if let Some(ccw) = self.side_data_list.iter().find_map(|d| d.rotation) {
            return Rotation::from_degrees(-ccw);
        }
        self.tags
            .rotate
            .as_deref()
            .and_then(|r| r.trim().parse::<f64>().ok())
            .map(Rotation::from_degrees)
            .unwrap_or_default()
    }
}

/// Errors from probing an input.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("unreadable ffprobe output: {0}")]
    Malformed(String),
    #[error("no video stream found")]
    NoVideoStream,
}

/// Probe the input described by `input_args` (e.g. `["-i", "clip.mp4"]`).
pub fn probe(ffprobe: &str, input_args: &[String]) -> Result<StreamInfo, ProbeError> {
    let mut args: Vec<String> = [
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_streams",
        "-of",
        "json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.extend_from_slice(input_args);

    let stdout = run_to_output(ffprobe, &args)?;
    let info = parse_probe_output(&String::from_utf8_lossy(&stdout))?;
    log::debug!(
        "Probed {}: {} @ {:?} fps, rotation {:?}",
        input_args.join(" "),
        info.size,
        info.frame_rate,
        info.rotation
    );
    Ok(info)
}

fn parse_probe_output(json: &str) -> Result<StreamInfo, ProbeError> {
    let output: ProbeOutput =
        serde_json::from_str(json).map_err(|e| ProbeError::Malformed(e.to_string()))?;

    let stream = output
        .streams
        .into_iter()
        .next()
        .ok_or(ProbeError::NoVideoStream)?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => {
            let rotation = stream.rotation();
            let size = if rotation.swaps_dimensions() {
                FrameSize::new(height, width)
            } else {
                FrameSize::new(width, height)
            };
            Ok(StreamInfo {
                size,
                frame_rate: stream.r_frame_rate.as_deref().and_then(parse_rational),
                rotation,
            })
        }
        _ => Err(ProbeError::NoVideoStream),
    }
}

/// Parse an FFmpeg rational like `30000/1001`. `0/0` yields `None`.
fn parse_rational(s: &str) -> Option<f64> {
    let (num, den) = match s.split_once('/') {
        Some((n, d)) => (n.trim().parse::<f64>().ok()?, d.trim().parse::<f64>().ok()?),
        None => (s.trim().parse::<f64>().ok()?, 1.0),
    };
    if den == 0.0 || num <= 0.0 {
        return None;
    }
    Some(num / den)
}
