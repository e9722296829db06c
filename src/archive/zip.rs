use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

use super::ArchiveExtractor;

/// Extractor for .zip archives (portable dev builds)
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        let name = archive_path.to_string_lossy().to_lowercase();
        name.ends_with(".zip")
    }

    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        debug!("Extracting zip archive to {:?}...", extract_to);
        let mut file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        // ZipArchive needs Read + Seek; Runtime::open only gives Read
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?;

        let mut archive = ZipArchive::new(std::io::Cursor::new(buffer))
            .with_context(|| "Failed to parse ZIP archive")?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .with_context(|| format!("Failed to read ZIP entry {}", i))?;

            let entry_path = match entry.enclosed_name() {
                Some(path) => path.to_path_buf(),
                None => {
                    debug!("Skipping entry with unsafe path {:?}", entry.name());
                    continue;
                }
            };

            let full_path = extract_to.join(&entry_path);

            if entry.is_dir() {
                runtime.create_dir_all(&full_path)?;
                continue;
            }

            if let Some(parent) = full_path.parent() {
                runtime.create_dir_all(parent)?;
            }
            let mut dest_file = runtime.create_file(&full_path)?;
            std::io::copy(&mut entry, &mut dest_file)
                .with_context(|| format!("Failed to extract file {:?}", full_path))?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode()
                && let Err(e) = runtime.set_permissions(&full_path, mode)
            {
                debug!("Failed to set permissions on {:?}: {}", full_path, e);
            }
        }

        info!("Extraction complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_archives;
    use crate::runtime::RealRuntime;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    #[test]
    fn test_can_handle_zip() {
        let extractor = ZipExtractor;
        assert!(extractor.can_handle(Path::new("nvgt.zip")));
        assert!(extractor.can_handle(Path::new("NVGT.ZIP")));
        assert!(!extractor.can_handle(Path::new("nvgt.tar.gz")));
        assert!(!extractor.can_handle(Path::new("nvgt.exe")));
    }

    #[test]
    fn test_extract_archive_with_multiple_toplevel_dirs() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("nvgt.zip");
        let extract_path = dir.path().join("extracted");
        fs::create_dir(&extract_path)?;

        fs::write(
            &archive_path,
            test_archives::zip(&[("lib/bass.dll", "dll"), ("include/form.nvgt", "form")])?,
        )?;

        ZipExtractor.extract(&RealRuntime, &archive_path, &extract_path)?;

        assert_eq!(fs::read_to_string(extract_path.join("lib/bass.dll"))?, "dll");
        assert_eq!(
            fs::read_to_string(extract_path.join("include/form.nvgt"))?,
            "form"
        );
        Ok(())
    }

    #[test]
    fn test_extract_empty_archive_produces_nothing() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("nvgt.zip");
        let extract_path = dir.path().join("extracted");
        fs::create_dir(&extract_path)?;

        fs::write(&archive_path, test_archives::zip(&[])?)?;

        ZipExtractor.extract(&RealRuntime, &archive_path, &extract_path)?;
        assert_eq!(fs::read_dir(&extract_path)?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_extract_corrupted_archive() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("nvgt.zip");
        let extract_path = dir.path().join("extracted");
        fs::create_dir(&extract_path).unwrap();

        fs::write(&archive_path, "corrupted data").unwrap();

        let result = ZipExtractor.extract(&RealRuntime, &archive_path, &extract_path);
        assert!(result.is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_extract_archive_preserves_file_permissions() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let archive_path = dir.path().join("nvgt.zip");
        let extract_path = dir.path().join("extracted");
        fs::create_dir(&extract_path)?;

        {
            let file = File::create(&archive_path)?;
            let mut zip = ZipWriter::new(file);

            let options: FileOptions<()> = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(0o755);
            zip.start_file("nvgt", options)?;
            zip.write_all(b"elf")?;

            let options: FileOptions<()> = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(0o644);
            zip.start_file("readme.md", options)?;
            zip.write_all(b"docs")?;

            zip.finish()?;
        }

        ZipExtractor.extract(&RealRuntime, &archive_path, &extract_path)?;

        let binary_mode = fs::metadata(extract_path.join("nvgt"))?.permissions().mode();
        assert!(
            binary_mode & 0o111 != 0,
            "Expected nvgt to be executable, but mode was {:o}",
            binary_mode
        );

        let readme_mode = fs::metadata(extract_path.join("readme.md"))?
            .permissions()
            .mode();
        assert!(
            readme_mode & 0o111 == 0,
            "Expected readme.md to NOT be executable, but mode was {:o}",
            readme_mode
        );

        Ok(())
    }

    #[test]
    fn test_extract_archive_with_directory_entries() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("nvgt.zip");
        let extract_path = dir.path().join("extracted");
        fs::create_dir(&extract_path)?;

        {
            let file = File::create(&archive_path)?;
            let mut zip = ZipWriter::new(file);
            let options: FileOptions<()> =
                FileOptions::default().compression_method(CompressionMethod::Stored);

            zip.add_directory("nvgt/lib/", options)?;
            zip.start_file("nvgt/lib/libbass.so", options)?;
            zip.write_all(b"so")?;

            zip.finish()?;
        }

        ZipExtractor.extract(&RealRuntime, &archive_path, &extract_path)?;

        assert!(extract_path.join("nvgt/lib").is_dir());
        assert_eq!(
            fs::read_to_string(extract_path.join("nvgt/lib/libbass.so"))?,
            "so"
        );
        Ok(())
    }

    #[test]
    fn test_extract_nonexistent_archive() {
        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("nonexistent.zip");
        let extract_path = dir.path().join("extracted");

        let result = ZipExtractor.extract(&RealRuntime, &archive_path, &extract_path);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to open archive")
        );
    }
}
