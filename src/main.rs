use clap::{Parser, Subcommand};
use gridwall::types::StaticLayout;
use gridwall::{config, logging, manifest, output, server};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gridwall")]
#[command(about = "Serve an endlessly drifting photo wall")]
#[command(long_about = "\
Serve an endlessly drifting photo wall

Every visit to / rescans the theme image directories and rewrites one
manifest per theme, which the page then loads.

Static root layout:

  static/
  ├── images/
  │   ├── general/               # Theme images (jpg, jpeg, png, gif, webp)
  │   └── machu/
  └── data/                      # Generated: <theme>.txt, one URL per line

Run 'gridwall gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Static-assets root holding images/ and data/
    #[arg(long, default_value = "static", global = true)]
    root: PathBuf,

    /// Directory searched for config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve {
        /// Listen address, overriding [server] addr
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// Regenerate all manifests once and exit
    Scan,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve { addr: None }) {
        Command::Serve { addr } => {
            logging::init_logging(logging::DEFAULT_LOG_FILTER);
            let config = config::load_config(&cli.config_dir)?;
            let addr = addr.unwrap_or(config.server.addr);
            let state = Arc::new(server::AppState::new(
                config,
                StaticLayout::new(&cli.root),
            )?);
            tracing::info!(
                root = %state.layout().root().display(),
                themes = state.config().themes.len(),
                "configuration loaded"
            );

            server::run(state, addr).await?;
        }
        Command::Scan => {
            logging::init_logging("warn");
            let config = config::load_config(&cli.config_dir)?;
            let layout = StaticLayout::new(&cli.root);
            let summaries = manifest::regenerate(&layout, &config.themes)?;
            output::print_regenerate_output(&summaries);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
