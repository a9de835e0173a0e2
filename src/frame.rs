//! Frame and frame size types.

use std::fmt;

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of bytes in one packed frame of this size.
    pub fn frame_len(&self, format: PixelFormat) -> usize {
        self.width as usize * self.height as usize * format.bytes_per_pixel()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel layout of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// Packed blue, green, red (3 bytes per pixel)
    #[default]
    Bgr24,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Bgr24 => 3,
        }
    }

    /// Name FFmpeg uses for this layout in `-pix_fmt`.
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            PixelFormat::Bgr24 => "bgr24",
        }
    }
}

/// One decoded raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw pixel data, row-major, no padding
    pub data: Vec<u8>,
    pub size: FrameSize,
    pub format: PixelFormat,
}

impl Frame {
    /// Wrap raw BGR24 data. Returns `None` if the length does not match the size.
    pub fn from_bgr(size: FrameSize, data: Vec<u8>) -> Option<Self> {
        if data.len() != size.frame_len(PixelFormat::Bgr24) {
            return None;
        }
        Some(Self {
            data,
            size,
            format: PixelFormat::Bgr24,
        })
    }

    /// A frame filled with a single BGR colour.
    pub fn filled(size: FrameSize, bgr: [u8; 3]) -> Self {
        let pixels = size.width as usize * size.height as usize;
        let data = bgr.iter().copied().cycle().take(pixels * 3).collect();
        Self {
            data,
            size,
            format: PixelFormat::Bgr24,
        }
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }
}
