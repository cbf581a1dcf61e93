//! Durable published-run state: index, retention, latest pointer.
//!
//! Three pieces share one rule — durable state is only ever mutated by
//! atomic replacement, never in place:
//!
//! - [`RunIndex`]: the ordered record of published runs, persisted as a
//!   JSON array via write-temp-then-rename.
//! - [`enforce`]: oldest-first eviction down to the retention cap, with
//!   per-entry deferral when an unmount is busy.
//! - [`LatestPointer`]: the `latest` symlink, repointed by temp-link +
//!   atomic rename.

mod index;
mod pointer;
mod retention;

pub use index::RunIndex;
pub use pointer::LatestPointer;
pub use retention::{enforce, Deferred, EvictionReport};
