//! Runtime abstraction for system operations.
//!
//! Everything the installer does to the host (file system, privilege checks,
//! spawning setup programs) goes through the [`Runtime`] trait so the
//! install and uninstall flows can be exercised against a mock.
//!
//! # Structure
//!
//! - `env` - Privilege detection
//! - `fs` - File system operations (read, write, directory, permissions)
//! - `process` - External programs (setup executables, `hdiutil`, `cp`, `nvgt` itself)

mod env;
mod fs;
mod process;

use anyhow::Result;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // File System
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn is_symlink(&self, path: &Path) -> bool;
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>>;
    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>>;

    /// Set file permissions (mode) on Unix systems. No-op on Windows.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;

    // Privilege
    fn is_privileged(&self) -> bool;

    // Processes
    /// Run a program to completion. Fails if it cannot be started or exits non-zero.
    fn run_command(&self, program: &Path, args: &[String]) -> Result<()>;

    /// Run a program attached to this terminal and return its exit code.
    fn run_interactive(&self, program: &Path, args: &[String]) -> Result<i32>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.rename_impl(from, to)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.remove_file_impl(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.remove_dir_all_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.is_symlink_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        self.create_file_impl(path)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>> {
        self.open_impl(path)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        self.set_permissions_impl(path, mode)
    }

    fn is_privileged(&self) -> bool {
        self.is_privileged_impl()
    }

    fn run_command(&self, program: &Path, args: &[String]) -> Result<()> {
        self.run_command_impl(program, args)
    }

    fn run_interactive(&self, program: &Path, args: &[String]) -> Result<i32> {
        self.run_interactive_impl(program, args)
    }
}
