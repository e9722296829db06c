use crate::runtime::Runtime;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::{debug, info};
use std::path::Path;
use tar::Archive;

use super::ArchiveExtractor;

/// Extractor for .tar.gz / .tgz archives, the format of NVGT's Linux builds
pub struct TarGzExtractor;

impl ArchiveExtractor for TarGzExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        let name = archive_path.to_string_lossy().to_lowercase();
        name.ends_with(".tar.gz") || name.ends_with(".tgz")
    }

    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        debug!("Extracting tar.gz archive to {:?}...", extract_to);
        let file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        let mut archive = Archive::new(GzDecoder::new(file));
        archive.set_preserve_permissions(true);
        archive.set_overwrite(true);

        // `unpack` refuses entries that would escape `extract_to`
        archive
            .unpack(extract_to)
            .with_context(|| format!("Failed to unpack {:?}", archive_path))?;

        info!("Extraction complete.");
        Ok(())
    }
}
