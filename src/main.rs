use clap::Parser;
use std::path::PathBuf;

use rtpview::config::AppConfig;
use rtpview::error::ViewerError;
use rtpview::pipeline::ViewerPipeline;
use rtpview::runner;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// UDP port to listen on, overriding the configuration
    #[arg(long)]
    port: Option<u16>,
}

fn run() -> rtpview::ViewerResult<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_toml_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(port) = args.port {
        config.network.port = port;
    }

    log::info!(
        "Listening for RTP/{} on UDP port {}",
        config.network.encoding,
        config.network.port
    );

    let mut pipeline = ViewerPipeline::new(&config)?;
    runner::run(&mut pipeline)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => {}
        Err(ViewerError::Stream { .. }) => {
            // already reported by the dispatch loop
            std::process::exit(1);
        }
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    }
}
