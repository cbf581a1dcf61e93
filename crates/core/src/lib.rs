//! Core types for the runvault archive lifecycle.
//!
//! This crate defines the vocabulary shared by every other crate:
//!
//! - [`RunId`]: sortable identifier naming one published run
//! - [`IdSource`]: seam for identifier generation ([`UtcIds`] in production)
//! - [`ArchiveLayout`]: explicit path schema under the public root
//! - [`VaultConfig`]: validated manager configuration
//! - [`Error`] / [`Result`]: the canonical error surface

mod config;
mod error;
mod ids;
mod layout;

pub use config::VaultConfig;
pub use error::{Error, Result};
pub use ids::{IdSource, RunId, UtcIds};
pub use layout::ArchiveLayout;
