mod app;
mod cache;
mod config;
mod error;
mod event;
mod jokes;
mod logging;
mod net;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jokebox")]
#[command(about = "A terminal UI for random jokes, with an offline cache")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/jokebox/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Joke endpoint to fetch from
  #[arg(long)]
  api_url: Option<String>,

  /// Start offline: show the cache, never touch the network
  #[arg(long)]
  offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Log to a file; the terminal belongs to the TUI
  let _log_guard = logging::init()?;

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command-line flags win over the file
  if let Some(url) = args.api_url {
    config.api.url = url;
  }
  if args.offline {
    config.offline = true;
  }

  // Initialize and run the app
  let mut app = app::App::new(config).await?;
  app.run().await?;

  Ok(())
}
