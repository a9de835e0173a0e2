//! FourCC codec identifiers and their FFmpeg encoder mapping.

use std::fmt;
use std::str::FromStr;

use crate::error::HelperError;

/// Four-character codec code, e.g. `mp4v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fourcc([u8; 4]);

impl Fourcc {
    pub const MP4V: Fourcc = Fourcc(*b"mp4v");

    pub fn as_str(&self) -> &str {
        // Only constructed from ASCII
        std::str::from_utf8(&self.0).unwrap_or("????")
    }

    /// FFmpeg arguments selecting the encoder for this FourCC.
    pub fn to_ffmpeg_args(&self) -> Result<Vec<String>, HelperError> {
        let args: &[&str] = match self.as_str().to_ascii_lowercase().as_str() {
            "mp4v" => &["-c:v", "mpeg4", "-tag:v", "mp4v"],
            "xvid" => &["-c:v", "mpeg4", "-tag:v", "xvid"],
            "avc1" | "h264" => &["-c:v", "libx264", "-pix_fmt", "yuv420p"],
            "mjpg" => &["-c:v", "mjpeg"],
            _ => {
                return Err(HelperError::InvalidArgument(format!(
                    "unsupported fourcc '{}' (supported: mp4v, xvid, avc1, h264, mjpg)",
                    self
                )))
            }
        };
        Ok(args.iter().map(|s| s.to_string()).collect())
    }
}

impl Default for Fourcc {
    fn default() -> Self {
        Self::MP4V
    }
}

impl fmt::Display for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Fourcc {
    type Err = HelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(|b| b.is_ascii_graphic()) {
            return Err(HelperError::InvalidArgument(format!(
                "fourcc must be exactly 4 printable ASCII characters, got '{}'",
                s
            )));
        }
        Ok(Fourcc([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
