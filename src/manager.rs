//! The archive lifecycle manager.
//!
//! One invocation per test cycle: load index → generate identifier →
//! publish → enforce retention → append → persist → repoint latest. Each
//! stage's postcondition is the next stage's precondition; the durable
//! index is the commit point.

use runvault_archive::{ArchiveBackend, Packer};
use runvault_core::{ArchiveLayout, Error, IdSource, Result, RunId, VaultConfig};
use runvault_store::{enforce, Deferred, LatestPointer, RunIndex};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// What one completed invocation did.
#[derive(Debug)]
pub struct CycleReport {
    /// Identifier the new run was published under.
    pub published: RunId,
    /// Old runs evicted this cycle, oldest first.
    pub evicted: Vec<RunId>,
    /// Evictions deferred to a later cycle (busy unmounts).
    pub deferred: Vec<Deferred>,
}

/// Drives the archive lifecycle for one public root.
pub struct ArchiveManager {
    layout: ArchiveLayout,
    retain: usize,
    backend: Box<dyn ArchiveBackend>,
    ids: Box<dyn IdSource>,
}

impl std::fmt::Debug for ArchiveManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveManager")
            .field("layout", &self.layout)
            .field("retain", &self.retain)
            .finish_non_exhaustive()
    }
}

impl ArchiveManager {
    /// Build a manager; validates the configuration before touching the
    /// filesystem, then ensures the public root exists.
    pub fn new(
        config: VaultConfig,
        backend: Box<dyn ArchiveBackend>,
        ids: Box<dyn IdSource>,
    ) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.public_root)?;
        let layout = ArchiveLayout::new(config.public_root, backend.image_extension());
        Ok(ArchiveManager {
            layout,
            retain: config.retain,
            backend,
            ids,
        })
    }

    /// Publish `run_dir` and bring the archive back under the cap.
    ///
    /// All-or-nothing for the new run: any publish failure aborts with
    /// the index and pointer untouched. Deferred evictions of old runs
    /// are reported, not raised. Artifacts under the public root that the
    /// index does not list are ignored (leftovers of an interrupted
    /// invocation; the enforcer reconciles listed ones).
    pub fn run_cycle(&mut self, run_dir: &Path) -> Result<CycleReport> {
        let mut index = RunIndex::load(self.layout.index_path())?;

        let id = self.ids.next_id(index.newest());
        if index.contains(&id) {
            return Err(Error::DuplicateEntry(id));
        }

        let packer = Packer::new(self.backend.as_ref(), &self.layout);
        let archive = packer.publish(run_dir, &id)?;

        let report = enforce(&mut index, self.retain, self.backend.as_ref(), &self.layout);
        index.append(id.clone())?;
        index.persist()?;

        LatestPointer::new(&self.layout).update(&id)?;
        info!(
            published = %id,
            evicted = report.evicted.len(),
            deferred = report.deferred.len(),
            "cycle complete"
        );

        Ok(CycleReport {
            published: archive.id,
            evicted: report.evicted,
            deferred: report.deferred,
        })
    }

    /// The path schema this manager operates under.
    pub fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }

    /// Resolve the `latest` pointer, if any run has been published.
    pub fn latest(&self) -> Result<Option<PathBuf>> {
        LatestPointer::new(&self.layout).resolve()
    }
}
