//! The latest pointer.
//!
//! One symlink, `<public_root>/latest`, always resolving to the most
//! recently published run's mount directory. Repointing goes through a
//! temporary link plus `rename`, which replaces the old link atomically:
//! a concurrent reader sees the previous target or the new one, never a
//! half-written reference.

use runvault_core::{ArchiveLayout, Error, Result, RunId};
use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::PathBuf;
use tracing::info;

/// Temporary link name used during an atomic repoint.
const TMP_LINK: &str = ".latest.tmp";

/// Atomic reference to the newest published run.
pub struct LatestPointer<'a> {
    layout: &'a ArchiveLayout,
}

impl<'a> LatestPointer<'a> {
    /// Pointer under `layout`'s public root.
    pub fn new(layout: &'a ArchiveLayout) -> Self {
        LatestPointer { layout }
    }

    /// Atomically repoint `latest` at `id`'s mount directory.
    ///
    /// The link target is relative (the run identifier itself), so the
    /// public root stays relocatable. Fails with [`Error::DanglingTarget`]
    /// and leaves the pointer unchanged if the mount does not exist.
    pub fn update(&self, id: &RunId) -> Result<()> {
        if !self.layout.mount_path(id).is_dir() {
            return Err(Error::DanglingTarget(id.clone()));
        }
        let latest = self.layout.latest_path();
        let tmp = latest.with_file_name(TMP_LINK);
        // Leftover from an interrupted repoint.
        if tmp.symlink_metadata().is_ok() {
            fs::remove_file(&tmp)?;
        }
        symlink(id.as_str(), &tmp)?;
        fs::rename(&tmp, &latest)?;
        info!(id = %id, "latest pointer updated");
        Ok(())
    }

    /// Resolve the pointer to an absolute mount path, if one exists.
    pub fn resolve(&self) -> Result<Option<PathBuf>> {
        match fs::read_link(self.layout.latest_path()) {
            Ok(target) => Ok(Some(self.layout.public_root().join(target))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
