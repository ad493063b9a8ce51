//! Kolosal Prep - Main Entry Point

use clap::Parser;
use kolosal_prep::cli::{cmd_config, cmd_info, cmd_run, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kolosal_prep=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { data, held_out, config, output, report } => {
            cmd_run(&data, held_out.as_deref(), config.as_deref(), output.as_deref(), report.as_deref())?;
        }
        Commands::Info { data } => {
            cmd_info(&data)?;
        }
        Commands::Config { output } => {
            cmd_config(output.as_deref())?;
        }
    }

    Ok(())
}
