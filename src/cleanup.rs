//! Temporary paths to remove if the process is interrupted mid-install.
//!
//! Normal success and failure paths clean up through `tempfile::TempDir`'s
//! drop; this registry only matters when Ctrl-C ends the process before
//! those destructors can run.

use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct CleanupContext {
    paths: Vec<PathBuf>,
}

impl CleanupContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn remove(&mut self, path: &Path) {
        self.paths.retain(|p| p != path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Best-effort removal of every registered path
    pub fn cleanup(&self) {
        for path in &self.paths {
            debug!("Cleaning up: {:?}", path);
            if path.is_dir() {
                let _ = std::fs::remove_dir_all(path);
            } else {
                let _ = std::fs::remove_file(path);
            }
        }
    }
}

pub type SharedCleanupContext = Arc<Mutex<CleanupContext>>;

pub fn new_shared() -> SharedCleanupContext {
    Arc::new(Mutex::new(CleanupContext::new()))
}

/// Keeps a path registered for interrupt cleanup while alive.
///
/// Dropping the registration unregisters the path; the owner of the path is
/// responsible for deleting it.
pub struct CleanupRegistration {
    ctx: SharedCleanupContext,
    path: PathBuf,
}

impl CleanupRegistration {
    pub fn new(ctx: &SharedCleanupContext, path: PathBuf) -> Self {
        if let Ok(mut guard) = ctx.lock() {
            guard.add(path.clone());
        }
        Self {
            ctx: Arc::clone(ctx),
            path,
        }
    }
}

impl Drop for CleanupRegistration {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.ctx.lock() {
            guard.remove(&self.path);
        }
    }
}
