//! Error kinds reported by the resolver, installer and uninstaller.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that end an install, uninstall or lookup.
///
/// None of these are retried; the command layer prints them and exits non-zero.
#[derive(Debug, Error)]
pub enum NvgtError {
    /// Platform name (explicit or detected) is not windows, linux or darwin
    #[error("Unsupported platform '{0}'. Supported platforms are: windows, linux, darwin")]
    UnsupportedPlatform(String),

    /// No release artifact could be found for the requested channel
    #[error("Failed to resolve a release: {0}")]
    Resolution(String),

    /// The artifact could not be fetched
    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    /// The artifact is corrupt, in an unexpected format, or could not be unpacked on this host
    #[error("Failed to extract {artifact}: {reason}")]
    Extraction { artifact: String, reason: String },

    /// The target path could not be written to or removed
    #[error("Filesystem error at {}: {reason}", path.display())]
    Filesystem { path: PathBuf, reason: String },
}

impl NvgtError {
    pub fn resolution(reason: impl Display) -> Self {
        NvgtError::Resolution(format!("{:#}", reason))
    }

    pub fn download(url: &str, reason: impl Display) -> Self {
        NvgtError::Download {
            url: url.to_string(),
            reason: format!("{:#}", reason),
        }
    }

    pub fn extraction(artifact: impl Display, reason: impl Display) -> Self {
        NvgtError::Extraction {
            artifact: artifact.to_string(),
            reason: format!("{:#}", reason),
        }
    }

    pub fn filesystem(path: &Path, reason: impl Display) -> Self {
        NvgtError::Filesystem {
            path: path.to_path_buf(),
            reason: format!("{:#}", reason),
        }
    }

    pub fn is_filesystem(&self) -> bool {
        matches!(self, NvgtError::Filesystem { .. })
    }
}
