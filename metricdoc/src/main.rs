//! Generate the KubeVirt metrics reference document.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use metricdoc::{GeneratorConfig, Generator};

/// KubeVirt metrics documentation generator.
#[derive(Parser, Debug)]
#[command(name = "metricdoc")]
#[command(about = "Generate the KubeVirt metrics reference document")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output document path (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error; overrides config).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration; validation waits for the CLI overrides
    let mut config = if let Some(config_path) = &args.config {
        GeneratorConfig::load_unvalidated(config_path)?
    } else {
        GeneratorConfig::default()
    };
    config.apply_overrides(args.output, args.log_level);
    config.validate()?;

    metricdoc_common::init_tracing(&config.logging)?;

    info!(
        config = ?args.config,
        output = %config.output.display(),
        namespace = %config.namespace,
        "Starting metricdoc"
    );

    let summary = Generator::new(config).run().await?;

    info!(total = summary.total, "Done");
    Ok(())
}
