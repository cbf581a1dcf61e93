//! The compression/mount technology seam.

use crate::error::BackendResult;
use std::path::Path;

/// Capability to pack, mount and unmount archive images.
///
/// Retention logic never touches a concrete technology; it drives this
/// trait. Implementations must leave no half-created image behind on a
/// failed `pack`, and `unmount` must leave the mount point an empty
/// directory on success.
pub trait ArchiveBackend: Send + Sync {
    /// File extension of the image format, without leading dot.
    fn image_extension(&self) -> &'static str;

    /// Compress the `source` directory tree into a single image at `image`.
    fn pack(&self, source: &Path, image: &Path) -> BackendResult<()>;

    /// Expose `image` read-only at `mount_point`, an existing empty
    /// directory.
    fn mount(&self, image: &Path, mount_point: &Path) -> BackendResult<()>;

    /// Release `mount_point`, leaving it an empty directory.
    ///
    /// May fail with the resource busy (an external reader holds it open);
    /// callers treat that as retryable, not fatal.
    fn unmount(&self, mount_point: &Path) -> BackendResult<()>;
}
