//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cv_helper::codec::Fourcc;

use super::enums::Function;

/// Parse and validate frame rate (positive, finite)
fn parse_frame_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid frame rate", s))?;
    if !rate.is_finite() || rate <= 0.0 {
        return Err(format!("Frame rate must be a positive number, got {}", s));
    }
    Ok(rate)
}

/// Parse a four character codec code
fn parse_fourcc(s: &str) -> Result<Fourcc, String> {
    s.parse().map_err(|e: cv_helper::HelperError| e.to_string())
}

/// Read images, play video and record video with FFmpeg
#[derive(Parser, Debug)]
#[command(name = "cv-helper")]
#[command(version, about = "Read images, play video and record video with FFmpeg", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Show an image until a key is pressed
    cv-helper -f read_image -p photo.jpg -d

    # Play a video at 30 fps (press q to quit)
    cv-helper -f play_video -p clip.mp4 -r 30

    # Record webcam 0 to out.mp4 while showing it (press s to stop)
    cv-helper -f write_video -p 0 -s out.mp4 -r 30 -d")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// The function to run
    #[arg(short, long, value_enum)]
    pub function: Option<Function>,

    /// Path to image or video file, or a camera device index
    #[arg(short, long)]
    pub path: Option<String>,

    /// Output video file (write_video only)
    #[arg(short, long = "save-path", alias = "save_path", default_value = "output.mp4")]
    pub save_path: PathBuf,

    /// Show the image or frames in a window
    #[arg(
        short,
        long = "display-image",
        aliases = ["display_image", "show_image"]
    )]
    pub display_image: bool,

    /// Playback/recording frame rate in frames per second
    #[arg(
        short = 'r',
        long = "frame-rate",
        alias = "frame_rate",
        default_value = "1000.0",
        value_parser = parse_frame_rate
    )]
    pub frame_rate: f64,

    /// Output codec FourCC (overrides the config file)
    #[arg(long, value_parser = parse_fourcc)]
    pub fourcc: Option<Fourcc>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print the frame size and rate a source reports
    Probe {
        /// Video file path or camera device index
        path: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
