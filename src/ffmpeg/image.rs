//! Still image decoding.

use std::path::Path;

use super::capture::decode_args;
use super::pipeline::run_to_output;
use super::probe::probe;
use crate::config::ToolsConfig;
use crate::error::{HelperError, Result};
use crate::frame::{Frame, PixelFormat};

/// Decode the first frame of the image at `path` to BGR24.
pub fn read_image(tools: &ToolsConfig, path: &Path) -> Result<Frame> {
    let decode_failed = |reason: String| HelperError::DecodeFailed {
        path: path.to_path_buf(),
        reason,
    };

    if !path.is_file() {
        return Err(decode_failed("no such file".to_string()));
    }

    let input = vec!["-i".to_string(), path.to_string_lossy().into_owned()];
    let info = probe(&tools.ffprobe, &input).map_err(|e| decode_failed(e.to_string()))?;

    let mut args = decode_args(input, &info);
    args.extend(["-frames:v".to_string(), "1".to_string(), "-".to_string()]);

    let data = run_to_output(&tools.ffmpeg, &args).map_err(|e| decode_failed(e.to_string()))?;
    let len = data.len();
    let frame = Frame::from_bgr(info.size, data).ok_or_else(|| {
        decode_failed(format!(
            "expected {} bytes for {}, got {}",
            info.size.frame_len(PixelFormat::Bgr24),
            info.size,
            len
        ))
    })?;

    log::info!("Read image {} ({})", path.display(), frame.size);
    Ok(frame)
}
