//! Places a resolved NVGT build at the target path.
//!
//! Every install downloads into a scoped temporary directory, stages the new
//! tree next to the target (so the final move is a rename on the same file
//! system) and only then replaces whatever was installed before.

mod locate;
mod native;
mod uninstall;

use anyhow::Result as AnyResult;
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::archive::{self, ArchiveExtractor};
use crate::cleanup::{CleanupRegistration, SharedCleanupContext};
use crate::download::download_file;
use crate::error::NvgtError;
use crate::http::HttpClient;
use crate::platform::Os;
use crate::resolver::ResolvedSource;
use crate::runtime::Runtime;

pub use locate::locate;
pub use uninstall::{Uninstalled, uninstall};

/// How a downloaded artifact turns into an installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// .tar.gz, .tgz or .zip, unpacked into the target path
    Archive,
    /// Silent Windows setup executable
    SetupProgram,
    /// macOS disk image holding NVGT.app
    DiskImage,
}

impl ArtifactKind {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") || name.ends_with(".zip") {
            Some(ArtifactKind::Archive)
        } else if name.ends_with(".exe") {
            Some(ArtifactKind::SetupProgram)
        } else if name.ends_with(".dmg") {
            Some(ArtifactKind::DiskImage)
        } else {
            None
        }
    }

    /// The host OS this kind has to be unpacked on, if any
    pub fn required_host(&self) -> Option<Os> {
        match self {
            ArtifactKind::Archive => None,
            ArtifactKind::SetupProgram => Some(Os::Windows),
            ArtifactKind::DiskImage => Some(Os::Darwin),
        }
    }

    pub fn runs_on(&self, host: Option<Os>) -> bool {
        match self.required_host() {
            None => true,
            Some(required) => host == Some(required),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Archive => f.write_str("archive"),
            ArtifactKind::SetupProgram => f.write_str("setup program"),
            ArtifactKind::DiskImage => f.write_str("disk image"),
        }
    }
}

pub struct Installer<'a, R: Runtime, E: ArchiveExtractor> {
    runtime: &'a R,
    http_client: &'a HttpClient,
    extractor: &'a E,
    cleanup_ctx: SharedCleanupContext,
    host: Option<Os>,
}

impl<'a, R: Runtime + 'static, E: ArchiveExtractor> Installer<'a, R, E> {
    pub fn new(
        runtime: &'a R,
        http_client: &'a HttpClient,
        extractor: &'a E,
        cleanup_ctx: SharedCleanupContext,
    ) -> Self {
        Self {
            runtime,
            http_client,
            extractor,
            cleanup_ctx,
            host: Os::detect().ok(),
        }
    }

    /// Override the detected host OS
    pub fn with_host(mut self, host: Option<Os>) -> Self {
        self.host = host;
        self
    }

    /// Download `source` and install it at `target`, replacing any previous installation.
    #[tracing::instrument(skip(self, source), fields(url = %source.url))]
    pub async fn install(&self, source: &ResolvedSource, target: &Path) -> Result<(), NvgtError> {
        let file_name = Path::new(&source.file_name)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| NvgtError::extraction(&source.file_name, "artifact has no file name"))?;

        let kind = ArtifactKind::from_file_name(&file_name)
            .ok_or_else(|| NvgtError::extraction(&file_name, "unrecognized artifact format"))?;

        if let Some(required) = kind.required_host()
            && !kind.runs_on(self.host)
        {
            return Err(NvgtError::extraction(
                &file_name,
                format!("a {} can only be installed from a {} host", kind, required),
            ));
        }

        let parent = self.prepare_target(target)?;

        let download_dir = tempfile::Builder::new()
            .prefix("nvgti-download-")
            .tempdir()
            .map_err(|e| NvgtError::filesystem(&std::env::temp_dir(), e))?;
        let _download_registration =
            CleanupRegistration::new(&self.cleanup_ctx, download_dir.path().to_path_buf());

        let artifact = download_dir.path().join(&file_name);
        download_file(self.runtime, &source.url, &artifact, self.http_client)
            .await
            .map_err(|e| NvgtError::download(&source.url, e))?;

        debug!("Installing {} {} into {:?}", kind, file_name, target);
        match kind {
            ArtifactKind::Archive => self.install_archive(&artifact, &file_name, &parent, target),
            ArtifactKind::SetupProgram => {
                native::run_setup_program(self.runtime, &artifact, &file_name, target)
            }
            ArtifactKind::DiskImage => native::install_disk_image(
                self.runtime,
                &self.cleanup_ctx,
                &artifact,
                &file_name,
                &parent,
                target,
            ),
        }?;

        info!("Installed {} at {}", file_name, target.display());
        Ok(())
    }

    /// Check the target can hold an installation and create its parent.
    fn prepare_target(&self, target: &Path) -> Result<PathBuf, NvgtError> {
        if self.runtime.exists(target) && !self.runtime.is_dir(target) {
            return Err(NvgtError::filesystem(
                target,
                "path exists and is not a directory",
            ));
        }

        let parent = staging_parent(target);
        self.runtime
            .create_dir_all(&parent)
            .map_err(|e| NvgtError::filesystem(&parent, e))?;
        Ok(parent)
    }

    fn install_archive(
        &self,
        artifact: &Path,
        file_name: &str,
        parent: &Path,
        target: &Path,
    ) -> Result<(), NvgtError> {
        let staging = new_staging_dir(parent)?;
        let _staging_registration =
            CleanupRegistration::new(&self.cleanup_ctx, staging.path().to_path_buf());

        self.extractor
            .extract(self.runtime, artifact, staging.path())
            .map_err(|e| NvgtError::extraction(file_name, e))?;

        let root = archive::content_root(self.runtime, staging.path())
            .map_err(|e| NvgtError::extraction(file_name, e))?;

        replace_target(self.runtime, &root, target)
    }
}

/// Directory the staging tree is created in; the target's parent, or `.` for bare names.
fn staging_parent(target: &Path) -> PathBuf {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn new_staging_dir(parent: &Path) -> Result<tempfile::TempDir, NvgtError> {
    tempfile::Builder::new()
        .prefix(".nvgti-staging-")
        .tempdir_in(parent)
        .map_err(|e| NvgtError::filesystem(parent, e))
}

/// Swap the staged tree into place, removing the previous installation first.
fn replace_target<R: Runtime>(runtime: &R, staged: &Path, target: &Path) -> Result<(), NvgtError> {
    if runtime.exists(target) || runtime.is_symlink(target) {
        debug!("Removing previous installation at {:?}", target);
        remove_path(runtime, target).map_err(|e| NvgtError::filesystem(target, e))?;
    }

    runtime
        .rename(staged, target)
        .map_err(|e| NvgtError::filesystem(target, e))
}

fn remove_path<R: Runtime>(runtime: &R, path: &Path) -> AnyResult<()> {
    if runtime.is_dir(path) && !runtime.is_symlink(path) {
        runtime.remove_dir_all(path)
    } else {
        runtime.remove_file(path)
    }
}
