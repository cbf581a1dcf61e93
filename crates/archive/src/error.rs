//! Backend-level errors.
//!
//! These stay below the canonical `runvault_core::Error`: the packer maps
//! them into `PackFailure` / `MountFailure`, and the retention enforcer
//! turns unmount failures into per-entry deferrals.

use thiserror::Error;

/// Errors raised by an [`crate::ArchiveBackend`] implementation.
#[derive(Debug, Error)]
pub enum BackendError {
    /// External tool exited with a non-zero status.
    #[error("{tool} exited with {status}: {stderr}")]
    Tool {
        /// Tool name (mksquashfs, mount, umount)
        tool: String,
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// External tool could not be launched at all.
    #[error("{tool} could not be launched: {source}")]
    Spawn {
        /// Tool name
        tool: String,
        /// Underlying launch error
        source: std::io::Error,
    },

    /// Archive format error (malformed tar stream, zstd frame, ...).
    #[error("archive error: {0}")]
    Archive(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

impl BackendError {
    /// Create an archive format error.
    pub fn archive(msg: impl Into<String>) -> Self {
        BackendError::Archive(msg.into())
    }
}
