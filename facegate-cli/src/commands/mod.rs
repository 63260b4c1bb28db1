//! CLI command implementations

pub mod face;
pub mod login;
pub mod register;
pub mod reset;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use facegate_core::FacegateContext;

/// Get the facegate directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FACEGATE_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".facegate"))
        .context("Could not find home directory")
}

/// Get or create the facegate context
pub fn get_context() -> Result<FacegateContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create facegate directory: {:?}", data_dir))?;

    FacegateContext::new(&data_dir).context("Failed to initialize facegate context")
}
