//! The `recreate config` command for configuration management.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use recreate_core::{config::expand_path, Config};

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
///
/// `path` is the `--config` override, if any.
pub async fn execute(args: ConfigArgs, path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load_or_default_path(path)?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", resolve(path).display());
        }

        ConfigCommand::Init { force } => {
            let path = resolve(path);
            init(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn resolve(path: Option<&str>) -> PathBuf {
    path.map(expand_path).unwrap_or_else(Config::default_path)
}

/// Write the default configuration to `path`.
fn init(path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init(&path, false).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.providers.openai.image_model, "dall-e-3");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 8080\n").unwrap();

        let err = init(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));

        init(&path, true).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 5000);
    }
}
