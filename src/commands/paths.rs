use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::runtime::Runtime;

/// Get the default package directory
#[tracing::instrument(skip(runtime))]
pub fn default_source_root<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let data_dir = runtime
        .data_dir()
        .context("Could not find the user data directory")?;
    Ok(data_dir.join("pkgfeed").join("packages"))
}
