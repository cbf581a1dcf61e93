//! Path schema under the public root.
//!
//! Everything the archive subsystem touches lives under one configured
//! directory; this type is the single place that knows the naming scheme:
//!
//! ```text
//! <public_root>/
//! ├── index.json        # durable run index (ordered JSON array)
//! ├── latest            # symlink to the newest run's mount directory
//! ├── <id>.<ext>        # immutable archive image per run
//! └── <id>/             # read-only mount directory per run
//! ```

use crate::ids::RunId;
use std::path::{Path, PathBuf};

/// File name of the durable index record.
pub const INDEX_FILE: &str = "index.json";

/// Name of the latest-pointer symlink.
pub const LATEST_NAME: &str = "latest";

/// Resolved path schema for one public root.
#[derive(Debug, Clone)]
pub struct ArchiveLayout {
    public_root: PathBuf,
    image_ext: &'static str,
}

impl ArchiveLayout {
    /// Build the schema for `public_root` with the backend's image extension.
    pub fn new(public_root: impl Into<PathBuf>, image_ext: &'static str) -> Self {
        ArchiveLayout {
            public_root: public_root.into(),
            image_ext,
        }
    }

    /// The configured public root directory.
    pub fn public_root(&self) -> &Path {
        &self.public_root
    }

    /// Archive image path for `id`.
    pub fn image_path(&self, id: &RunId) -> PathBuf {
        self.public_root.join(format!("{}.{}", id, self.image_ext))
    }

    /// Mount directory for `id`.
    pub fn mount_path(&self, id: &RunId) -> PathBuf {
        self.public_root.join(id.as_str())
    }

    /// Path of the durable index record.
    pub fn index_path(&self) -> PathBuf {
        self.public_root.join(INDEX_FILE)
    }

    /// Path of the latest-pointer symlink.
    pub fn latest_path(&self) -> PathBuf {
        self.public_root.join(LATEST_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_schema() {
        let layout = ArchiveLayout::new("/srv/web", "sqsh");
        let id = RunId::new("run-20250101T000000.000Z");

        assert_eq!(
            layout.image_path(&id),
            PathBuf::from("/srv/web/run-20250101T000000.000Z.sqsh")
        );
        assert_eq!(
            layout.mount_path(&id),
            PathBuf::from("/srv/web/run-20250101T000000.000Z")
        );
        assert_eq!(layout.index_path(), PathBuf::from("/srv/web/index.json"));
        assert_eq!(layout.latest_path(), PathBuf::from("/srv/web/latest"));
    }

    #[test]
    fn multi_part_extension_is_preserved() {
        let layout = ArchiveLayout::new("/srv/web", "tar.zst");
        let id = RunId::new("run-20250101T000000.000Z");
        assert_eq!(
            layout.image_path(&id),
            PathBuf::from("/srv/web/run-20250101T000000.000Z.tar.zst")
        );
    }
}
