//! Installers for the platform-native artifacts: the Windows setup program
//! and the macOS disk image.

use log::{debug, warn};
use std::path::{Path, PathBuf};

use super::{new_staging_dir, replace_target};
use crate::cleanup::{CleanupRegistration, SharedCleanupContext};
use crate::error::NvgtError;
use crate::platform::Os;
use crate::runtime::Runtime;

/// Inno Setup switches for an unattended install
const SETUP_FLAGS: [&str; 3] = ["/VERYSILENT", "/SUPPRESSMSGBOXES", "/NORESTART"];

const APP_BUNDLE: &str = "NVGT.app";

pub(super) fn setup_args(target: &Path) -> Vec<String> {
    let mut args: Vec<String> = SETUP_FLAGS.iter().map(|flag| flag.to_string()).collect();
    args.push(format!("/DIR={}", target.display()));
    args
}

/// Run the downloaded setup program silently, pointed at `target`.
#[tracing::instrument(skip(runtime))]
pub(super) fn run_setup_program<R: Runtime>(
    runtime: &R,
    setup: &Path,
    file_name: &str,
    target: &Path,
) -> Result<(), NvgtError> {
    runtime
        .run_command(setup, &setup_args(target))
        .map_err(|e| NvgtError::extraction(file_name, e))
}

/// Mount the image, copy NVGT.app out of it and make the binary executable.
#[tracing::instrument(skip(runtime, cleanup_ctx))]
pub(super) fn install_disk_image<R: Runtime>(
    runtime: &R,
    cleanup_ctx: &SharedCleanupContext,
    image: &Path,
    file_name: &str,
    parent: &Path,
    target: &Path,
) -> Result<(), NvgtError> {
    let mount_dir = tempfile::Builder::new()
        .prefix("nvgti-mount-")
        .tempdir()
        .map_err(|e| NvgtError::filesystem(&std::env::temp_dir(), e))?;

    runtime
        .run_command(
            Path::new("hdiutil"),
            &[
                "attach".to_string(),
                image.display().to_string(),
                "-mountpoint".to_string(),
                mount_dir.path().display().to_string(),
                "-nobrowse".to_string(),
                "-quiet".to_string(),
            ],
        )
        .map_err(|e| NvgtError::extraction(file_name, e))?;
    let _mounted = MountedImage {
        runtime,
        mount_point: mount_dir.path().to_path_buf(),
    };

    let bundle = mount_dir.path().join(APP_BUNDLE);
    if !runtime.exists(&bundle) {
        return Err(NvgtError::extraction(
            file_name,
            format!("{} not found in disk image", APP_BUNDLE),
        ));
    }

    let staging = new_staging_dir(parent)?;
    let _staging_registration =
        CleanupRegistration::new(cleanup_ctx, staging.path().to_path_buf());
    let staged_bundle = staging.path().join(APP_BUNDLE);

    // cp -R keeps the bundle's symlinks and extended attributes intact
    runtime
        .run_command(
            Path::new("cp"),
            &[
                "-R".to_string(),
                bundle.display().to_string(),
                staged_bundle.display().to_string(),
            ],
        )
        .map_err(|e| NvgtError::filesystem(&staged_bundle, e))?;

    replace_target(runtime, &staged_bundle, target)?;

    let binary = Os::Darwin.executable_path(target);
    if runtime.exists(&binary) {
        runtime
            .set_permissions(&binary, 0o755)
            .map_err(|e| NvgtError::filesystem(&binary, e))?;
        verify_binary(runtime, &binary, file_name)?;
    } else {
        warn!("NVGT binary not found at {}", binary.display());
    }

    Ok(())
}

/// Smoke-test a freshly installed binary with `--help`.
fn verify_binary<R: Runtime>(runtime: &R, binary: &Path, file_name: &str) -> Result<(), NvgtError> {
    debug!("Verifying {:?}", binary);
    runtime
        .run_command(binary, &["--help".to_string()])
        .map_err(|e| NvgtError::extraction(file_name, format!("installed NVGT does not run: {:#}", e)))
}

/// Detaches the disk image when dropped.
struct MountedImage<'a, R: Runtime> {
    runtime: &'a R,
    mount_point: PathBuf,
}

impl<R: Runtime> Drop for MountedImage<'_, R> {
    fn drop(&mut self) {
        debug!("Detaching {:?}", self.mount_point);
        let args = [
            "detach".to_string(),
            self.mount_point.display().to_string(),
            "-quiet".to_string(),
        ];
        if let Err(e) = self.runtime.run_command(Path::new("hdiutil"), &args) {
            warn!("Failed to detach {}: {:#}", self.mount_point.display(), e);
        }
    }
}
