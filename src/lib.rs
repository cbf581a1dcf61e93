//! # Runvault
//!
//! Bounded, durable archive of completed test-run artifacts.
//!
//! A continuously-running test harness hands runvault one finished run
//! directory per cycle. Runvault packs it into an immutable archive
//! image, mounts it read-only under a public root, records it in a
//! durable ordered index, evicts the oldest runs beyond a retention cap,
//! and atomically repoints a `latest` symlink at the newest run.
//!
//! ## Quick Start
//!
//! ```ignore
//! use runvault::{ArchiveManager, SquashfsBackend, UtcIds, VaultConfig};
//!
//! let mut manager = ArchiveManager::new(
//!     VaultConfig::new("web", 10),
//!     Box::new(SquashfsBackend),
//!     Box::new(UtcIds),
//! )?;
//! let report = manager.run_cycle("logs_2025-06-30".as_ref())?;
//! println!("published {}", report.published);
//! ```
//!
//! ## Guarantees
//!
//! - The durable index and the `latest` pointer are only ever mutated by
//!   atomic replacement; external readers always see a consistent
//!   snapshot.
//! - A failed publish rolls back all partial artifacts for the current
//!   run; the previously committed state is untouched.
//! - After any successful invocation at most `retain` runs are mounted,
//!   modulo entries whose eviction was deferred by a busy unmount (they
//!   are retried next cycle).

#![warn(missing_docs)]

mod manager;

pub use manager::{ArchiveManager, CycleReport};

pub use runvault_archive::{
    ArchiveBackend, BackendError, BackendResult, Packer, PublishedArchive, SquashfsBackend,
    TarZstdBackend,
};
pub use runvault_core::{ArchiveLayout, Error, IdSource, Result, RunId, UtcIds, VaultConfig};
pub use runvault_store::{enforce, Deferred, EvictionReport, LatestPointer, RunIndex};
