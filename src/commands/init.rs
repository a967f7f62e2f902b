use crate::commands::Out;
use crate::{Config, Result};
use anyhow::{bail, Context};
use std::path::Path;

/// Writes a configuration file holding the default settings.
///
/// # Arguments
/// - `path` - Where to write the file, from `--config` or `BUDGET_EXPORT_CONFIG`.
/// - `force` - Overwrite an existing file.
///
/// # Errors
/// - Returns an error if no path was given, if the file exists and `force` is false, or if the
///   file cannot be written.
pub async fn init(path: Option<&Path>, force: bool) -> Result<Out<()>> {
    let Some(path) = path else {
        bail!("Pass --config (or set BUDGET_EXPORT_CONFIG) to say where the config file goes")
    };
    Config::create(path, force)
        .await
        .context("Unable to create the config file")?;
    Ok(format!("Wrote the default configuration to {}", path.display()).into())
}
