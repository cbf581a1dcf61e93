//! Tar-zstd backend: pure-Rust archive images.
//!
//! Images are zstd-compressed tar streams. "Mounting" extracts the image
//! into the mount directory and marks every file read-only, so the mounted
//! view has the same contract as a loop mount without needing privileges.

use crate::backend::ArchiveBackend;
use crate::error::{BackendError, BackendResult};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tar::{Archive, Builder};

/// Default zstd compression level.
const DEFAULT_LEVEL: i32 = 3;

/// Backend producing `.tar.zst` images.
#[derive(Debug, Clone, Copy)]
pub struct TarZstdBackend {
    level: i32,
}

impl TarZstdBackend {
    /// Backend with an explicit zstd compression level.
    pub fn with_level(level: i32) -> Self {
        TarZstdBackend { level }
    }
}

impl Default for TarZstdBackend {
    fn default() -> Self {
        TarZstdBackend {
            level: DEFAULT_LEVEL,
        }
    }
}

/// Recursively mark every file under `dir` read-only.
fn make_read_only(dir: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            make_read_only(&entry.path())?;
        } else {
            let mut perms = entry.metadata()?.permissions();
            perms.set_readonly(true);
            fs::set_permissions(entry.path(), perms)?;
        }
    }
    Ok(())
}

impl ArchiveBackend for TarZstdBackend {
    fn image_extension(&self) -> &'static str {
        "tar.zst"
    }

    fn pack(&self, source: &Path, image: &Path) -> BackendResult<()> {
        if !source.is_dir() {
            return Err(BackendError::archive(format!(
                "{} is not a directory",
                source.display()
            )));
        }
        let file = File::create(image)?;
        let encoder = zstd::Encoder::new(file, self.level)
            .map_err(|e| BackendError::archive(format!("zstd encode: {}", e)))?;
        let mut builder = Builder::new(encoder);
        builder
            .append_dir_all(".", source)
            .map_err(|e| BackendError::archive(format!("pack {}: {}", source.display(), e)))?;
        let encoder = builder
            .into_inner()
            .map_err(|e| BackendError::archive(format!("finish tar: {}", e)))?;
        let file = encoder
            .finish()
            .map_err(|e| BackendError::archive(format!("finish zstd: {}", e)))?;
        file.sync_all()?;
        Ok(())
    }

    fn mount(&self, image: &Path, mount_point: &Path) -> BackendResult<()> {
        let file = File::open(image)?;
        let decoder = zstd::Decoder::new(BufReader::new(file))
            .map_err(|e| BackendError::archive(format!("zstd decode: {}", e)))?;
        let mut archive = Archive::new(decoder);
        archive
            .unpack(mount_point)
            .map_err(|e| BackendError::archive(format!("unpack {}: {}", image.display(), e)))?;
        make_read_only(mount_point)?;
        Ok(())
    }

    fn unmount(&self, mount_point: &Path) -> BackendResult<()> {
        for entry in fs::read_dir(mount_point)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(entry.path())?;
            } else {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_run_dir(root: &Path) -> std::path::PathBuf {
        let run = root.join("run");
        fs::create_dir(&run).unwrap();
        fs::write(run.join("result.json"), b"{\"passed\": 12}").unwrap();
        fs::create_dir(run.join("pcaps")).unwrap();
        fs::write(run.join("pcaps").join("client.pcap"), vec![0u8; 4096]).unwrap();
        run
    }

    #[test]
    fn pack_then_mount_round_trips_contents() {
        let dir = tempdir().unwrap();
        let run = make_run_dir(dir.path());
        let image = dir.path().join("run.tar.zst");
        let mount = dir.path().join("mounted");
        fs::create_dir(&mount).unwrap();

        let backend = TarZstdBackend::default();
        backend.pack(&run, &image).unwrap();
        backend.mount(&image, &mount).unwrap();

        assert_eq!(
            fs::read(mount.join("result.json")).unwrap(),
            b"{\"passed\": 12}"
        );
        assert_eq!(
            fs::read(mount.join("pcaps").join("client.pcap")).unwrap(),
            vec![0u8; 4096]
        );
    }

    #[test]
    fn mounted_files_are_read_only() {
        let dir = tempdir().unwrap();
        let run = make_run_dir(dir.path());
        let image = dir.path().join("run.tar.zst");
        let mount = dir.path().join("mounted");
        fs::create_dir(&mount).unwrap();

        let backend = TarZstdBackend::default();
        backend.pack(&run, &image).unwrap();
        backend.mount(&image, &mount).unwrap();

        let perms = fs::metadata(mount.join("result.json")).unwrap().permissions();
        assert!(perms.readonly());
    }

    #[test]
    fn unmount_leaves_empty_directory() {
        let dir = tempdir().unwrap();
        let run = make_run_dir(dir.path());
        let image = dir.path().join("run.tar.zst");
        let mount = dir.path().join("mounted");
        fs::create_dir(&mount).unwrap();

        let backend = TarZstdBackend::default();
        backend.pack(&run, &image).unwrap();
        backend.mount(&image, &mount).unwrap();
        backend.unmount(&mount).unwrap();

        assert!(mount.is_dir());
        assert_eq!(fs::read_dir(&mount).unwrap().count(), 0);
    }

    #[test]
    fn packing_a_missing_source_fails() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("run.tar.zst");

        let backend = TarZstdBackend::default();
        let err = backend.pack(&dir.path().join("nope"), &image).unwrap_err();
        assert!(matches!(err, BackendError::Archive(_)));
    }

    #[test]
    fn mounting_a_corrupt_image_fails() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("bad.tar.zst");
        fs::write(&image, b"not an archive").unwrap();
        let mount = dir.path().join("mounted");
        fs::create_dir(&mount).unwrap();

        let backend = TarZstdBackend::default();
        assert!(backend.mount(&image, &mount).is_err());
    }
}
