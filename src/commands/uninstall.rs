use anyhow::Result;
use std::path::PathBuf;

use crate::{
    installer::{self, Uninstalled},
    platform::Os,
    runtime::Runtime,
};

use super::warn_if_unprivileged;

/// Remove the installation at `path`, or at the platform's default location.
///
/// The host OS is only consulted when neither a path nor a platform is given.
#[tracing::instrument(skip(runtime))]
pub fn uninstall<R: Runtime>(
    runtime: R,
    path: Option<PathBuf>,
    platform: Option<&str>,
) -> Result<()> {
    let explicit = platform.map(str::parse::<Os>).transpose()?;
    let path = match path {
        Some(path) => path,
        None => {
            let os = match explicit {
                Some(os) => os,
                None => Os::detect()?,
            };
            os.default_install_path()
        }
    };

    match installer::uninstall(&runtime, &path) {
        Ok(Uninstalled::Removed) => {
            println!("NVGT uninstalled from {}", path.display());
            Ok(())
        }
        Ok(Uninstalled::NotInstalled) => {
            println!("Nothing to uninstall at {}", path.display());
            Ok(())
        }
        Err(e) => {
            warn_if_unprivileged(&runtime, &e);
            Err(e.into())
        }
    }
}
