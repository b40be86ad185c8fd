//! Output writing and check-mode verification.

use crate::fs::Filesystem;
use anyhow::Result;
use std::path::Path;
use thiserror::Error;

/// Check-mode failures, typed so the CLI can map each to its own exit code.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("documentation does not exist: {path}")]
    Missing { path: String },
    #[error("documentation is not up-to-date, changes have been detected")]
    Outdated,
}

/// Persist the rendered documentation, overwriting unconditionally.
pub fn write_documentation(
    filesystem: &dyn Filesystem,
    output_path: &Path,
    content: &str,
) -> Result<()> {
    filesystem.write(output_path, content)?;
    tracing::info!(path = %output_path.display(), "generated documentation");
    Ok(())
}

/// Compare the existing documentation byte-for-byte against freshly
/// rendered content. Never mutates the filesystem.
pub fn check_documentation(
    filesystem: &dyn Filesystem,
    output_path: &Path,
    content: &str,
) -> Result<()> {
    tracing::info!("running in check mode, no file will be written");

    if !filesystem.exists(output_path) {
        return Err(CheckError::Missing {
            path: output_path.display().to_string(),
        }
        .into());
    }

    let existing = filesystem.read_to_string(output_path)?;
    if existing != content {
        return Err(CheckError::Outdated.into());
    }

    tracing::info!("documentation is up-to-date");
    Ok(())
}
