//! Recreate CLI - describe a photo with a vision model, then recreate it with an image model.
//!
//! Recreate serves a small JSON API used by the web and mobile clients, and can
//! also run the same pipeline once against a local file.
//!
//! # Usage
//!
//! ```bash
//! # Start the API on port 5000
//! recreate serve
//!
//! # Recreate a single photo and print the record
//! recreate process photo.jpg
//!
//! # View configuration
//! recreate config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;
mod server;

/// Recreate - describe a photo, then regenerate it from the description.
#[derive(Parser, Debug)]
#[command(name = "recreate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "RECREATE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(cli::serve::ServeArgs),

    /// Describe and recreate a single local photo
    Process(cli::process::ProcessArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal outside development.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go straight to stderr.
    let (config, load_error) = match recreate_core::Config::load_or_default_path(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `recreate config path`."
            );
            (recreate_core::Config::default(), Some(e))
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Recreate v{}", recreate_core::VERSION);
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Serve(args) => {
            // Serving on defaults after a broken config would hide the mistake.
            if let Some(e) = load_error {
                return Err(e.into());
            }
            cli::serve::execute(args, config).await
        }
        Commands::Process(args) => cli::process::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()).await,
    }
}
