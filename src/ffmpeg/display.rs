//! On-screen display of frames through `ffplay` windows.

use std::collections::HashMap;
use std::io::{self, Write};

use super::pipeline::{PipeMode, Pipeline};
use crate::backend::Display;
use crate::error::{HelperError, Result};
use crate::frame::{Frame, FrameSize, PixelFormat};

/// ffplay arguments for a window showing raw BGR24 frames from stdin.
pub fn window_args(title: &str, size: FrameSize) -> Vec<String> {
    let video_size = size.to_string();
    [
        "-v",
        "error",
        "-hide_banner",
        "-window_title",
        title,
        "-fflags",
        "nobuffer",
        "-f",
        "rawvideo",
        "-pixel_format",
        PixelFormat::Bgr24.ffmpeg_name(),
        "-video_size",
        video_size.as_str(),
        // Show frames as soon as they arrive; pacing is done by the caller
        "-framerate",
        "1000",
        "-i",
        "-",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

struct Window {
    size: FrameSize,
    pipeline: Pipeline,
}

/// Named ffplay windows, one child process per window title.
pub struct FfplayDisplay {
    ffplay: String,
    windows: HashMap<String, Window>,
}

impl FfplayDisplay {
    pub fn new(ffplay: impl Into<String>) -> Self {
        Self {
            ffplay: ffplay.into(),
            windows: HashMap::new(),
        }
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn window_for(&mut self, title: &str, size: FrameSize) -> Result<&mut Window> {
        let reopen = self.windows.get(title).map_or(true, |w| w.size != size);
        if reopen {
            if let Some(mut old) = self.windows.remove(title) {
                let _ = old.pipeline.shutdown();
            }
            let pipeline = Pipeline::spawn(&self.ffplay, &window_args(title, size), PipeMode::Write)?;
            log::debug!("Opened window '{}' ({})", title, size);
            self.windows
                .insert(title.to_string(), Window { size, pipeline });
        }
        self.windows
            .get_mut(title)
            .ok_or_else(|| HelperError::Display(format!("window '{}' missing", title)))
    }
}

impl Display for FfplayDisplay {
    fn show(&mut self, title: &str, frame: &Frame) -> Result<()> {
        let window = self.window_for(title, frame.size)?;

        // ffplay exits when the user presses q/Esc or closes the window
        if !window.pipeline.is_running() {
            self.windows.remove(title);
            return Err(HelperError::WindowClosed);
        }

        let result = match window.pipeline.stdin() {
            Some(stdin) => stdin.write_all(&frame.data).and_then(|_| stdin.flush()),
            None => Err(io::Error::from(io::ErrorKind::BrokenPipe)),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                self.windows.remove(title);
                Err(HelperError::WindowClosed)
            }
            Err(e) => Err(HelperError::Display(e.to_string())),
        }
    }

    fn close_all(&mut self) {
        for (title, mut window) in self.windows.drain() {
            log::debug!("Closing window '{}'", title);
            let _ = window.pipeline.shutdown();
        }
    }
}

impl Drop for FfplayDisplay {
    fn drop(&mut self) {
        self.close_all();
    }
}
