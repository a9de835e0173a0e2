mod cli;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};
use cv_helper::config::Config;
use cv_helper::Result;

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the log subscriber. `RUST_LOG` overrides the default level.
fn init_logging(debug: bool) {
    let default = if debug { "cv_helper=debug" } else { "cv_helper=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;

    match (&args.command, args.function) {
        (Some(Command::Config { action }), _) => {
            cli::handle_config_action(action.clone(), args.config.as_deref(), &config)
        }
        (Some(Command::Probe { path }), _) => cli::probe(path, &config),
        (None, Some(function)) => cli::run_function(function, &args, &config),
        (None, None) => {
            let _ = Args::command().print_help();
            println!();
            Ok(())
        }
    }
}
