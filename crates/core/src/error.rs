//! Canonical error type for the archive lifecycle.
//!
//! One enum covers the whole taxonomy. Deferred evictions (busy unmounts)
//! are deliberately *not* errors: they are per-entry data in the cycle
//! report, because they never abort an invocation.

use crate::ids::RunId;
use thiserror::Error;

/// All runvault errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Retention cap below the minimum of one kept run.
    #[error("invalid retention cap {0}: must keep at least 1 run")]
    InvalidRetention(usize),

    /// Packing the run directory into an archive image failed.
    #[error("packing run {id} failed: {reason}")]
    PackFailure {
        /// Run being packed
        id: RunId,
        /// Backend failure description
        reason: String,
    },

    /// Mounting a freshly packed image failed.
    #[error("mounting run {id} failed: {reason}")]
    MountFailure {
        /// Run being mounted
        id: RunId,
        /// Backend failure description
        reason: String,
    },

    /// Identifier is already present in the index.
    ///
    /// Signals an identifier-generation bug upstream; never silently
    /// overwrites an existing entry.
    #[error("run {0} is already published")]
    DuplicateEntry(RunId),

    /// Latest-pointer update requested for a run with no mounted archive.
    #[error("latest pointer target for run {0} does not exist")]
    DanglingTarget(RunId),

    /// The durable index record could not be parsed.
    #[error("index record corrupted: {0}")]
    IndexCorrupted(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for runvault operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error means the current run was never published.
    ///
    /// Publish failures roll back all partial artifacts; the index and
    /// pointer are untouched, so the invocation is externally a no-op.
    pub fn is_publish_failure(&self) -> bool {
        matches!(self, Error::PackFailure { .. } | Error::MountFailure { .. })
    }

    /// Whether this error was raised before any filesystem mutation.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::InvalidRetention(_))
    }
}
