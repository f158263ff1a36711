//! The `recreate process` command: run one local photo through the pipeline
//! without starting the server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use recreate_core::{config::expand_path, Config, ImagePipeline, ImageRecord, MemoryStore};

/// Arguments for the `process` command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Photo to describe and recreate
    #[arg(required = true)]
    pub input: PathBuf,

    /// Keep the base64 original in the printed record
    #[arg(long)]
    pub include_original: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs, config: Config) -> anyhow::Result<()> {
    let input = expand_path(&args.input.to_string_lossy());
    if !input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            input
        );
    }

    let bytes = std::fs::read(&input)?;
    let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
    tracing::debug!(path = %input.display(), bytes = bytes.len(), "Read input photo");

    let pipeline = ImagePipeline::from_config(&config, Arc::new(MemoryStore::new()))?;

    let spinner = create_spinner(&input);
    let result = pipeline.process(&payload).await;
    spinner.finish_and_clear();

    let record = match result {
        Ok(record) => record,
        Err(e) => anyhow::bail!("{}\n  ({e})", e.user_message()),
    };

    let json = render(&record, args.include_original)?;
    match args.output {
        Some(path) => {
            let path = expand_path(&path.to_string_lossy());
            std::fs::write(&path, format!("{json}\n"))?;
            tracing::info!("Wrote record to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Pretty JSON for a record, with the original payload blanked unless requested.
fn render(record: &ImageRecord, include_original: bool) -> anyhow::Result<String> {
    let mut value = serde_json::to_value(record)?;
    if !include_original {
        if let Some(obj) = value.as_object_mut() {
            obj.remove("originalImage");
        }
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

fn create_spinner(input: &std::path::Path) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}") {
        spinner.set_style(style);
    }
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    spinner.set_message(format!("Describing and recreating {name}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
