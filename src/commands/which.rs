use anyhow::{Result, bail};
use std::path::PathBuf;

use crate::{installer, platform::resolve_os, runtime::Runtime};

/// Print the NVGT executable of an installation, failing when it is missing.
#[tracing::instrument(skip(runtime))]
pub fn which<R: Runtime>(runtime: R, path: Option<PathBuf>, platform: Option<&str>) -> Result<()> {
    let os = resolve_os(platform)?;
    let path = path.unwrap_or_else(|| os.default_install_path());

    match installer::locate(&runtime, os, &path) {
        Some(executable) => {
            println!("{}", executable.display());
            Ok(())
        }
        None => bail!("NVGT is not installed at {}", path.display()),
    }
}
