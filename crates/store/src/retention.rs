//! Retention enforcement.
//!
//! Evicts the oldest published runs until the cap leaves room for the run
//! being published this invocation. An entry leaves the index only after
//! its backing resources are actually freed; a busy unmount defers that
//! entry to the next invocation instead of desyncing index and
//! filesystem.

use crate::index::RunIndex;
use runvault_archive::ArchiveBackend;
use runvault_core::{ArchiveLayout, RunId};
use std::fs;
use tracing::{info, warn};

/// One eviction postponed to a later invocation.
#[derive(Debug, Clone)]
pub struct Deferred {
    /// Entry that stays in the index.
    pub id: RunId,
    /// Why its resources could not be freed.
    pub reason: String,
}

/// Outcome of one enforcement pass.
#[derive(Debug, Default)]
pub struct EvictionReport {
    /// Entries evicted and removed from the index.
    pub evicted: Vec<RunId>,
    /// Entries retained because unmounting failed.
    pub deferred: Vec<Deferred>,
}

/// Evict the oldest entries so the index has room for one more run.
///
/// With `len` entries and a cap of `cap` (≥ 1, validated at
/// configuration time), the first `len + 1 - cap` entries are the
/// eviction candidates; newer entries are never touched even when a
/// candidate's eviction is deferred. Each candidate is handled
/// independently: unmount, delete image, delete the empty mount
/// directory, then drop the index entry.
///
/// A candidate whose mount directory is already gone (crash leftovers,
/// manual cleanup) is reconciled rather than unmounted: any leftover
/// image is deleted and the stale entry dropped.
pub fn enforce(
    index: &mut RunIndex,
    cap: usize,
    backend: &dyn ArchiveBackend,
    layout: &ArchiveLayout,
) -> EvictionReport {
    let needed = (index.len() + 1).saturating_sub(cap);
    let candidates: Vec<RunId> = index.ids().iter().take(needed).cloned().collect();

    let mut report = EvictionReport::default();
    for id in candidates {
        match evict_one(&id, backend, layout) {
            Ok(()) => {
                index.remove(&id);
                info!(id = %id, "evicted run");
                report.evicted.push(id);
            }
            Err(reason) => {
                warn!(id = %id, %reason, "eviction deferred, will retry next cycle");
                report.deferred.push(Deferred { id, reason });
            }
        }
    }
    report
}

fn evict_one(
    id: &RunId,
    backend: &dyn ArchiveBackend,
    layout: &ArchiveLayout,
) -> std::result::Result<(), String> {
    let mount = layout.mount_path(id);
    let image = layout.image_path(id);

    if !mount.is_dir() {
        // Stale entry: the mount is already gone, reconcile leftovers.
        if image.is_file() {
            fs::remove_file(&image).map_err(|e| e.to_string())?;
        }
        return Ok(());
    }

    backend.unmount(&mount).map_err(|e| e.to_string())?;
    if image.is_file() {
        fs::remove_file(&image).map_err(|e| e.to_string())?;
    }
    fs::remove_dir(&mount).map_err(|e| e.to_string())?;
    Ok(())
}
