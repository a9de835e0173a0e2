//! CLI enum types.

use clap::ValueEnum;
use std::fmt;

/// Operation selected with `--function`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Function {
    /// Decode an image and optionally show it
    #[value(name = "read_image", alias = "read-image")]
    ReadImage,
    /// Play a video file or camera
    #[value(name = "play_video", alias = "play-video")]
    PlayVideo,
    /// Record a video file or camera to disk
    #[value(name = "write_video", alias = "write-video")]
    WriteVideo,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Function::ReadImage => "read_image",
            Function::PlayVideo => "play_video",
            Function::WriteVideo => "write_video",
        };
        f.write_str(name)
    }
}

impl Function {
    /// Whether this function listens for key presses.
    pub fn needs_keys(&self, display: bool) -> bool {
        match self {
            Function::ReadImage => display,
            Function::PlayVideo | Function::WriteVideo => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_from_str() {
        assert_eq!(
            Function::from_str("read_image", false).unwrap(),
            Function::ReadImage
        );
        assert_eq!(
            Function::from_str("play-video", false).unwrap(),
            Function::PlayVideo
        );
        assert!(Function::from_str("show_image", false).is_err());
    }

    #[test]
    fn test_function_display_matches_value_name() {
        for function in Function::value_variants() {
            let name = function.to_possible_value().unwrap();
            assert_eq!(function.to_string(), name.get_name());
        }
    }

    #[test]
    fn test_needs_keys() {
        assert!(!Function::ReadImage.needs_keys(false));
        assert!(Function::ReadImage.needs_keys(true));
        assert!(Function::PlayVideo.needs_keys(false));
        assert!(Function::WriteVideo.needs_keys(false));
    }
}
