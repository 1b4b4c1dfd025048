//! StoryCraft CLI binary.
//!
//! This binary provides command-line access to the pipeline:
//! - Run a pitch through every stage and print the final video URI
//! - Pick one scene's prompts out of a blueprint file
//! - Show the effective configuration

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_pitch, select_scene, show_config};

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if cli.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Run(args) => {
            run_pitch(args).await?;
        }

        Commands::SelectScene { blueprint, index } => {
            select_scene(&blueprint, index)?;
        }

        Commands::Config { config } => {
            show_config(config.as_deref())?;
        }
    }

    Ok(())
}
