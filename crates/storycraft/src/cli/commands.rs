//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use storycraft::StoreKind;

/// StoryCraft - turn a one-line pitch into a narrated short video
#[derive(Parser, Debug)]
#[command(name = "storycraft")]
#[command(about = "Turn a one-line pitch into a narrated, scored short video", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the whole pipeline for a pitch
    Run(RunArgs),

    /// Print one scene's prompts and voiceover from a blueprint file
    SelectScene {
        /// Path to the blueprint JSON
        blueprint: PathBuf,

        /// Scene index (clamped to the last scene)
        #[arg(long, default_value_t = 0)]
        index: usize,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Configuration file overriding the bundled defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Arguments of the `run` command.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// One-line story idea
    #[arg(long)]
    pub pitch: String,

    /// Number of scenes (defaults to `pipeline.num_scenes`)
    #[arg(long)]
    pub scenes: Option<u32>,

    /// Visual style applied to every image
    #[arg(long)]
    pub style: Option<String>,

    /// Narration language display name
    #[arg(long)]
    pub language_name: Option<String>,

    /// Narration language code, e.g. en-US
    #[arg(long)]
    pub language_code: Option<String>,

    /// Scenes processed at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Whole-run budget in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Configuration file overriding the bundled defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where to keep generated assets
    #[arg(long, default_value_t = StoreKind::Memory)]
    pub store: StoreKind,

    /// Write the enriched blueprint to this file
    #[arg(long)]
    pub output: Option<PathBuf>,
}
