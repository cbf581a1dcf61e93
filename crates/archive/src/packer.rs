//! Run publication.
//!
//! [`Packer::publish`] turns a finished run directory into a mounted,
//! immutable archive. Every failure path rolls the current run's partial
//! artifacts back, so a failed publish leaves the public root exactly as
//! it was — the index and pointer are never told about it.

use crate::backend::ArchiveBackend;
use runvault_core::{ArchiveLayout, Error, Result, RunId};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// The materialized read-only representation of one published run.
#[derive(Debug, Clone)]
pub struct PublishedArchive {
    /// Identifier the run was published under.
    pub id: RunId,
    /// Immutable archive image.
    pub image: PathBuf,
    /// Read-only mount directory exposing the run's files.
    pub mount: PathBuf,
}

/// Publishes run directories through an [`ArchiveBackend`].
pub struct Packer<'a> {
    backend: &'a dyn ArchiveBackend,
    layout: &'a ArchiveLayout,
}

impl<'a> Packer<'a> {
    /// Packer over `backend` using `layout`'s path schema.
    pub fn new(backend: &'a dyn ArchiveBackend, layout: &'a ArchiveLayout) -> Self {
        Packer { backend, layout }
    }

    /// Pack `run_dir` into an image, mount it, and remove the original.
    ///
    /// On success the mount directory exposes byte-identical contents
    /// read-only and `run_dir` is gone (no double storage). On failure no
    /// partial image or mount point survives.
    pub fn publish(&self, run_dir: &Path, id: &RunId) -> Result<PublishedArchive> {
        let image = self.layout.image_path(id);
        if let Err(e) = self.backend.pack(run_dir, &image) {
            let _ = fs::remove_file(&image);
            return Err(Error::PackFailure {
                id: id.clone(),
                reason: e.to_string(),
            });
        }

        let mount = self.layout.mount_path(id);
        let mounted = fs::create_dir(&mount)
            .map_err(Into::into)
            .and_then(|_| self.backend.mount(&image, &mount));
        if let Err(e) = mounted {
            let _ = fs::remove_dir_all(&mount);
            let _ = fs::remove_file(&image);
            return Err(Error::MountFailure {
                id: id.clone(),
                reason: e.to_string(),
            });
        }

        // Verify the mount resolves before dropping the only other copy.
        fs::read_dir(&mount)?;
        fs::remove_dir_all(run_dir)?;
        info!(id = %id, image = %image.display(), "published run");

        Ok(PublishedArchive {
            id: id.clone(),
            image,
            mount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BackendError, BackendResult};
    use crate::tar_zstd::TarZstdBackend;
    use tempfile::tempdir;

    fn make_run_dir(root: &Path) -> PathBuf {
        let run = root.join("fresh-run");
        fs::create_dir(&run).unwrap();
        fs::write(run.join("result.json"), b"{\"passed\": 3}").unwrap();
        run
    }

    fn test_id() -> RunId {
        RunId::new("run-20250101T000000.000Z")
    }

    #[test]
    fn publish_mounts_and_removes_source() {
        let dir = tempdir().unwrap();
        let run = make_run_dir(dir.path());
        let backend = TarZstdBackend::default();
        let layout = ArchiveLayout::new(dir.path(), backend.image_extension());

        let packer = Packer::new(&backend, &layout);
        let archive = packer.publish(&run, &test_id()).unwrap();

        assert!(archive.image.is_file());
        assert_eq!(
            fs::read(archive.mount.join("result.json")).unwrap(),
            b"{\"passed\": 3}"
        );
        assert!(!run.exists(), "source directory must be removed");
    }

    #[test]
    fn pack_failure_leaves_nothing_behind() {
        let dir = tempdir().unwrap();
        let backend = TarZstdBackend::default();
        let layout = ArchiveLayout::new(dir.path(), backend.image_extension());
        let id = test_id();

        let packer = Packer::new(&backend, &layout);
        let err = packer
            .publish(&dir.path().join("missing-run"), &id)
            .unwrap_err();

        assert!(matches!(err, Error::PackFailure { .. }));
        assert!(!layout.image_path(&id).exists());
        assert!(!layout.mount_path(&id).exists());
    }

    /// Packs fine, refuses to mount.
    struct MountlessBackend(TarZstdBackend);

    impl ArchiveBackend for MountlessBackend {
        fn image_extension(&self) -> &'static str {
            self.0.image_extension()
        }
        fn pack(&self, source: &Path, image: &Path) -> BackendResult<()> {
            self.0.pack(source, image)
        }
        fn mount(&self, _image: &Path, _mount_point: &Path) -> BackendResult<()> {
            Err(BackendError::archive("loop device unavailable"))
        }
        fn unmount(&self, mount_point: &Path) -> BackendResult<()> {
            self.0.unmount(mount_point)
        }
    }

    #[test]
    fn mount_failure_rolls_back_image_and_mount_dir() {
        let dir = tempdir().unwrap();
        let run = make_run_dir(dir.path());
        let backend = MountlessBackend(TarZstdBackend::default());
        let layout = ArchiveLayout::new(dir.path(), backend.image_extension());
        let id = test_id();

        let packer = Packer::new(&backend, &layout);
        let err = packer.publish(&run, &id).unwrap_err();

        assert!(matches!(err, Error::MountFailure { .. }));
        assert!(!layout.image_path(&id).exists());
        assert!(!layout.mount_path(&id).exists());
        assert!(run.exists(), "failed publish must not consume the run");
    }
}
