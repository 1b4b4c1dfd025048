//! Configuration inspection.

use std::path::Path;
use storycraft::{StorycraftConfig, StorycraftResult};

/// Load configuration from an explicit file or the usual layers.
pub fn load_config(path: Option<&Path>) -> StorycraftResult<StorycraftConfig> {
    match path {
        Some(path) => StorycraftConfig::from_file(path),
        None => StorycraftConfig::load(),
    }
}

/// Print the effective configuration as TOML.
pub fn show_config(path: Option<&Path>) -> StorycraftResult<()> {
    let config = load_config(path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
