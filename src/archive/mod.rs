mod tar_gz;
mod zip;

use crate::runtime::Runtime;
use anyhow::{Result, anyhow};
use log::debug;
use std::path::{Path, PathBuf};

pub use tar_gz::TarGzExtractor;
pub use zip::ZipExtractor;

/// Trait for format-specific archive extractors
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor: Send + Sync {
    /// Check if this extractor can handle the given archive format
    fn can_handle(&self, archive_path: &Path) -> bool;

    /// Unpack every entry of the archive under `extract_to`, keeping the archive's layout
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()>;
}

/// Dispatcher that selects the appropriate extractor based on archive format.
pub struct ArchiveExtractorImpl {
    tar_gz: TarGzExtractor,
    zip: ZipExtractor,
}

impl Default for ArchiveExtractorImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveExtractorImpl {
    pub fn new() -> Self {
        Self {
            tar_gz: TarGzExtractor,
            zip: ZipExtractor,
        }
    }
}

impl ArchiveExtractor for ArchiveExtractorImpl {
    fn can_handle(&self, archive_path: &Path) -> bool {
        self.tar_gz.can_handle(archive_path) || self.zip.can_handle(archive_path)
    }

    #[tracing::instrument(skip(self, runtime))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        if self.tar_gz.can_handle(archive_path) {
            return self.tar_gz.extract(runtime, archive_path, extract_to);
        }
        if self.zip.can_handle(archive_path) {
            return self.zip.extract(runtime, archive_path, extract_to);
        }
        Err(anyhow!(
            "Unsupported archive format: {}",
            archive_path.display()
        ))
    }
}

/// The directory holding the installable files of an unpacked archive.
///
/// Release archives often wrap everything in one top-level folder
/// (`nvgt_0.89/...`); in that case the folder itself is returned so its
/// contents end up directly under the install path.
#[tracing::instrument(skip(runtime))]
pub fn content_root<R: Runtime>(runtime: &R, extracted: &Path) -> Result<PathBuf> {
    let entries = runtime.read_dir(extracted)?;

    match entries.as_slice() {
        [] => Err(anyhow!("Archive appears to be empty.")),
        [single] if runtime.is_dir(single) => {
            debug!("Using single top-level directory {:?}", single);
            Ok(single.clone())
        }
        _ => Ok(extracted.to_path_buf()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_extractor_impl_can_handle() {
        let extractor = ArchiveExtractorImpl::new();
        assert!(extractor.can_handle(Path::new("nvgt_0.89.tar.gz")));
        assert!(extractor.can_handle(Path::new("nvgt.tgz")));
        assert!(extractor.can_handle(Path::new("nvgt.zip")));
        assert!(!extractor.can_handle(Path::new("nvgt_0.89.exe")));
        assert!(!extractor.can_handle(Path::new("nvgt_0.89.dmg")));
    }

    #[test]
    fn test_extractor_impl_dispatches_to_tar_gz() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("nvgt.tar.gz");
        let extract_path = dir.path().join("extracted");
        fs::create_dir(&extract_path)?;
        fs::write(
            &archive_path,
            test_archives::tar_gz(&[("nvgt/nvgt", "elf")])?,
        )?;

        ArchiveExtractorImpl::new().extract(&RealRuntime, &archive_path, &extract_path)?;

        assert_eq!(fs::read_to_string(extract_path.join("nvgt/nvgt"))?, "elf");
        Ok(())
    }

    #[test]
    fn test_extractor_impl_dispatches_to_zip() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("nvgt.zip");
        let extract_path = dir.path().join("extracted");
        fs::create_dir(&extract_path)?;
        fs::write(
            &archive_path,
            test_archives::zip(&[("nvgt/nvgt.exe", "pe")])?,
        )?;

        ArchiveExtractorImpl::new().extract(&RealRuntime, &archive_path, &extract_path)?;

        assert_eq!(fs::read_to_string(extract_path.join("nvgt/nvgt.exe"))?, "pe");
        Ok(())
    }

    #[test]
    fn test_extractor_impl_unsupported_format() {
        let extractor = ArchiveExtractorImpl::new();
        let result = extractor.extract(
            &RealRuntime,
            Path::new("/tmp/nvgt_0.89.dmg"),
            Path::new("/tmp/out"),
        );
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Unsupported archive format")
        );
    }

    #[test]
    fn test_content_root_single_directory() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_dir()
            .returning(|_| Ok(vec![PathBuf::from("/stage/nvgt_0.89")]));
        runtime.expect_is_dir().returning(|_| true);

        let root = content_root(&runtime, Path::new("/stage")).unwrap();
        assert_eq!(root, PathBuf::from("/stage/nvgt_0.89"));
    }

    #[test]
    fn test_content_root_single_file_keeps_stage() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_dir()
            .returning(|_| Ok(vec![PathBuf::from("/stage/nvgt")]));
        runtime.expect_is_dir().returning(|_| false);

        let root = content_root(&runtime, Path::new("/stage")).unwrap();
        assert_eq!(root, PathBuf::from("/stage"));
    }

    #[test]
    fn test_content_root_multiple_entries_keeps_stage() {
        let mut runtime = MockRuntime::new();
        runtime.expect_read_dir().returning(|_| {
            Ok(vec![
                PathBuf::from("/stage/include"),
                PathBuf::from("/stage/nvgt"),
            ])
        });

        let root = content_root(&runtime, Path::new("/stage")).unwrap();
        assert_eq!(root, PathBuf::from("/stage"));
    }

    #[test]
    fn test_content_root_empty_archive() {
        let mut runtime = MockRuntime::new();
        runtime.expect_read_dir().returning(|_| Ok(vec![]));

        let err = content_root(&runtime, Path::new("/stage")).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
