//! Handlers for `--function` dispatch and the config/probe subcommands.

use std::path::{Path, PathBuf};

use cv_helper::codec::Fourcc;
use cv_helper::config::{default_path, Config, DEFAULT_CONFIG};
use cv_helper::ffmpeg::{FfmpegBackend, FfplayDisplay};
use cv_helper::keys::KeyListener;
use cv_helper::player::{play_video, PlayOptions};
use cv_helper::recorder::{record_video, RecordOptions};
use cv_helper::source::open_source;
use cv_helper::viewer::view_image;
use cv_helper::{Capture, Display, HelperError, Result, Source};

use super::args::{Args, ConfigAction};
use super::enums::Function;

/// Run the operation selected with `--function`.
pub fn run_function(function: Function, args: &Args, config: &Config) -> Result<()> {
    let path = args.path.as_deref().ok_or_else(|| {
        HelperError::InvalidArgument(format!("--path is required for {}", function))
    })?;

    let bindings = config.key_bindings();
    // Only recording reads the codec setting
    let fourcc = match function {
        Function::WriteVideo => resolve_fourcc(args, config)?,
        Function::ReadImage | Function::PlayVideo => Fourcc::default(),
    };

    let mut backend = FfmpegBackend::new(config.tools.clone());
    let mut display = FfplayDisplay::new(config.tools.ffplay.clone());
    let mut keys = KeyListener::new();

    if function.needs_keys(args.display_image) {
        if let Err(e) = keys.start() {
            log::warn!("Could not start key listener: {}", e);
        }
        if let Err(e) = keys.install_interrupt_handler() {
            log::warn!("Could not set up Ctrl+C handler: {}", e);
        }
    }

    let result = match function {
        Function::ReadImage => view_image(
            &mut backend,
            &mut display,
            &mut keys,
            Path::new(path),
            args.display_image,
        )
        .map(|size| println!("Read {} ({})", path, size)),
        Function::PlayVideo => {
            let options = PlayOptions {
                frame_rate: args.frame_rate,
                bindings,
            };
            play_video(&mut backend, &mut display, &mut keys, path, &options).map(|report| {
                println!("Played {} frames ({:?})", report.frames, report.state)
            })
        }
        Function::WriteVideo => {
            let options = RecordOptions {
                save_path: args.save_path.clone(),
                frame_rate: args.frame_rate,
                fourcc,
                display: args.display_image,
                bindings,
            };
            record_video(&mut backend, &mut display, &mut keys, path, &options).map(|report| {
                println!(
                    "Wrote {} frames ({}) to {} ({:?})",
                    report.frames,
                    report.size,
                    report.output.display(),
                    report.state
                )
            })
        }
    };

    display.close_all();
    result
}

/// Output FourCC: the `--fourcc` flag, else the config file.
fn resolve_fourcc(args: &Args, config: &Config) -> Result<Fourcc> {
    match args.fourcc {
        Some(fourcc) => Ok(fourcc),
        None => Ok(config.fourcc()?),
    }
}

/// Open a source and print the frame size and rate it reports.
pub fn probe(path: &str, config: &Config) -> Result<()> {
    let mut backend = FfmpegBackend::new(config.tools.clone());
    let mut capture = open_source(&mut backend, path)?;
    let size = capture.frame_size();
    let rate = capture.frame_rate();
    capture.release();

    println!("Source: {}", Source::parse(path)?);
    println!("  Frame size: {}", size);
    match rate {
        Some(rate) => println!("  Frame rate: {:.3} fps", rate),
        None => println!("  Frame rate: unknown"),
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    config_path: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let path = config_path.map(PathBuf::from).unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  Quit key: {}", config.keys.quit);
            println!("  Stop key: {}", config.keys.stop);
            println!("  FourCC: {}", config.encoder.fourcc);
            println!("  ffmpeg: {}", config.tools.ffmpeg);
            println!("  ffprobe: {}", config.tools.ffprobe);
            println!("  ffplay: {}", config.tools.ffplay);
            println!();

            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found)", path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            if path.exists() {
                return Err(HelperError::InvalidArgument(format!(
                    "config file already exists: {} (use 'cv-helper config show' to view it)",
                    path.display()
                )));
            }
            write_default_config(&path)?;
            println!("Created config file: {}", path.display());
            Ok(())
        }
    }
}

fn write_default_config(path: &Path) -> Result<()> {
    let io_error = |source: std::io::Error| cv_helper::config::ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, DEFAULT_CONFIG).map_err(io_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_config_init_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        handle_config_action(ConfigAction::Init, Some(&path), &Config::default()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, DEFAULT_CONFIG);
        assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
    }

    #[test]
    fn test_config_init_refuses_to_overwrite() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = handle_config_action(ConfigAction::Init, Some(file.path()), &Config::default());
        assert!(matches!(result, Err(HelperError::InvalidArgument(_))));
    }

    #[test]
    fn test_config_show_succeeds_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(handle_config_action(ConfigAction::Show, Some(&path), &Config::default()).is_ok());
    }

    #[test]
    fn test_run_function_requires_path() {
        let args = Args::parse_from(["cv-helper", "-f", "play_video"]);
        let result = run_function(Function::PlayVideo, &args, &Config::default());
        match result {
            Err(HelperError::InvalidArgument(msg)) => assert!(msg.contains("--path")),
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
    }

    fn config_with_bad_fourcc() -> Config {
        Config::parse("[encoder]\nfourcc = \"toolong\"\n").unwrap()
    }

    #[test]
    fn test_bad_config_fourcc_only_affects_recording() {
        let config = config_with_bad_fourcc();

        let args = Args::parse_from(["cv-helper", "-f", "read_image", "-p", "/nonexistent/x.png"]);
        let result = run_function(Function::ReadImage, &args, &config);
        assert!(matches!(result, Err(HelperError::DecodeFailed { .. })));

        let args = Args::parse_from(["cv-helper", "-f", "write_video", "-p", "/nonexistent/x.mp4"]);
        let result = run_function(Function::WriteVideo, &args, &config);
        assert!(matches!(result, Err(HelperError::Config(_))));
    }

    #[test]
    fn test_fourcc_flag_overrides_bad_config() {
        let args = Args::parse_from(["cv-helper", "--fourcc", "MJPG"]);
        let fourcc = resolve_fourcc(&args, &config_with_bad_fourcc()).unwrap();
        assert_eq!(fourcc.as_str(), "MJPG");
    }

    #[test]
    fn test_probe_missing_file_is_unavailable() {
        let result = probe("/nonexistent/cv-helper/clip.mp4", &Config::default());
        assert!(matches!(result, Err(HelperError::SourceUnavailable { .. })));
    }

    #[test]
    fn test_read_missing_image_fails() {
        let args = Args::parse_from(["cv-helper", "-f", "read_image", "-p", "/nonexistent/x.png"]);
        let result = run_function(Function::ReadImage, &args, &Config::default());
        assert!(matches!(result, Err(HelperError::DecodeFailed { .. })));
    }
}
