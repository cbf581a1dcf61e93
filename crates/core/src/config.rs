//! Manager configuration.
//!
//! All process-wide state is explicit: the public root and the retention
//! cap are passed in at construction, never read from the environment or
//! the working directory.

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Configuration for one archive manager.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Directory holding images, mounts, the index and the latest pointer.
    pub public_root: PathBuf,
    /// Maximum number of published runs kept after each invocation.
    pub retain: usize,
}

impl VaultConfig {
    /// Build a configuration for `public_root` keeping `retain` runs.
    pub fn new(public_root: impl Into<PathBuf>, retain: usize) -> Self {
        VaultConfig {
            public_root: public_root.into(),
            retain,
        }
    }

    /// Reject unusable retention caps before any filesystem mutation.
    pub fn validate(&self) -> Result<()> {
        if self.retain < 1 {
            return Err(Error::InvalidRetention(self.retain));
        }
        Ok(())
    }
}
