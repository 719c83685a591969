//! Config command implementation.

use anyhow::Result;
use spotwatt_lib::prelude::*;
use std::path::Path;

/// Print the effective configuration with the API key masked.
pub(crate) fn show_config(config: &Config, path: &Path) -> Result<()> {
    let exists = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("# {}{exists}", path.display());
    print!("{}", config.masked().to_toml()?);
    Ok(())
}
