//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storycraft binary.

mod commands;
mod config;
mod run;
mod select;

pub use commands::{Cli, Commands, RunArgs};
pub use config::show_config;
pub use run::run_pitch;
pub use select::select_scene;
