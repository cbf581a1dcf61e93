//! Archive packing and publication.
//!
//! Converts a finished run directory into a single immutable archive image
//! mounted read-only at its canonical public location. Compression and
//! mount technology sit behind the [`ArchiveBackend`] trait:
//!
//! - [`SquashfsBackend`] shells out to `mksquashfs` / `mount` / `umount`
//!   and produces a loop-mounted squashfs image (requires privileges).
//! - [`TarZstdBackend`] writes a zstd-compressed tar image and "mounts" it
//!   by extracting into the mount directory read-only; no privileges
//!   needed, and it is the backend the test suites run against.
//!
//! [`Packer::publish`] drives a backend through pack → mount → verify and
//! rolls back every partial artifact when a step fails.

mod backend;
mod error;
mod packer;
mod squashfs;
mod tar_zstd;

pub use backend::ArchiveBackend;
pub use error::{BackendError, BackendResult};
pub use packer::{Packer, PublishedArchive};
pub use squashfs::SquashfsBackend;
pub use tar_zstd::TarZstdBackend;
