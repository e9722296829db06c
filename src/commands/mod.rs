use log::warn;

use crate::{error::NvgtError, runtime::Runtime};

mod compile;
pub mod config;
mod install;
mod uninstall;
mod which;

pub use compile::{compile, info};
pub use install::{InstallOptions, install, run};
pub use uninstall::uninstall;
pub use which::which;

/// Point at elevated privileges when a file system error hits an unprivileged run.
pub(crate) fn warn_if_unprivileged<R: Runtime>(runtime: &R, err: &NvgtError) {
    if err.is_filesystem() && !runtime.is_privileged() {
        #[cfg(windows)]
        warn!("Writing to this location may require running as Administrator.");
        #[cfg(not(windows))]
        warn!("Writing to this location may require root privileges (try sudo).");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use std::path::Path;

    #[test]
    fn test_privilege_check_only_for_filesystem_errors() {
        // Strict mock: is_privileged must not be called
        let runtime = MockRuntime::new();
        warn_if_unprivileged(&runtime, &NvgtError::resolution("offline"));

        let mut runtime = MockRuntime::new();
        runtime.expect_is_privileged().times(1).returning(|| true);
        warn_if_unprivileged(
            &runtime,
            &NvgtError::filesystem(Path::new("/opt/nvgt"), "Permission denied"),
        );
    }
}
