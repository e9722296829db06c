//! Privilege detection.

use super::RealRuntime;

impl RealRuntime {
    /// Root on Unix, an elevated token on Windows. The default install
    /// locations (`/opt/nvgt`, `C:\nvgt`, `/Applications`) usually need this.
    #[tracing::instrument(skip(self))]
    pub(crate) fn is_privileged_impl(&self) -> bool {
        #[cfg(unix)]
        return nix::unistd::geteuid().as_raw() == 0;

        #[cfg(windows)]
        return is_elevated::is_elevated();
    }
}
