use log::debug;
use std::path::Path;

use super::remove_path;
use crate::error::NvgtError;
use crate::runtime::Runtime;

/// Outcome of an uninstall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uninstalled {
    Removed,
    /// Nothing was at the path; not an error
    NotInstalled,
}

/// Remove whatever lives at `target`: a directory tree, a file or a dangling link.
#[tracing::instrument(skip(runtime))]
pub fn uninstall<R: Runtime>(runtime: &R, target: &Path) -> Result<Uninstalled, NvgtError> {
    if !runtime.exists(target) && !runtime.is_symlink(target) {
        debug!("Nothing at {:?}", target);
        return Ok(Uninstalled::NotInstalled);
    }

    remove_path(runtime, target).map_err(|e| NvgtError::filesystem(target, e))?;
    Ok(Uninstalled::Removed)
}
