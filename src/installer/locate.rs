use std::path::{Path, PathBuf};

use crate::platform::Os;
use crate::runtime::Runtime;

/// Path of the NVGT executable for `path`, if it is there.
///
/// `path` is either an installation directory (or `.app` bundle), in which
/// the platform's executable layout is looked up, or the executable itself.
pub fn locate<R: Runtime>(runtime: &R, os: Os, path: &Path) -> Option<PathBuf> {
    if runtime.exists(path) && !runtime.is_dir(path) {
        return Some(path.to_path_buf());
    }
    let executable = os.executable_path(path);
    runtime.exists(&executable).then_some(executable)
}
