//! Run identifiers.
//!
//! A [`RunId`] names one published run. Identifiers are derived from a UTC
//! timestamp so that lexicographic order equals chronological order; the
//! index relies on this to make oldest-first eviction a front-of-sequence
//! operation.
//!
//! Identifier generation sits behind the [`IdSource`] trait so tests can
//! script deterministic sequences. The production source is [`UtcIds`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one published run.
///
/// Opaque to everything except the layout (which embeds it in paths) and
/// the index (which sorts by append order). Lexicographic order equals
/// chronological order for identifiers produced by the same [`IdSource`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Wrap a raw identifier string.
    pub fn new(raw: impl Into<String>) -> Self {
        RunId(raw.into())
    }

    /// Derive an identifier from a UTC instant, millisecond precision.
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        RunId(format!("run-{}", at.format("%Y%m%dT%H%M%S%.3fZ")))
    }

    /// The identifier as a path-safe string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An identifier sorting strictly after `self`.
    ///
    /// Used when two invocations land on the same millisecond: appending a
    /// character to a string always sorts after the string itself.
    fn bumped(&self) -> RunId {
        RunId(format!("{}-0", self.0))
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh run identifiers.
///
/// `floor` is the newest identifier already in the index; the returned
/// identifier must sort strictly after it so the index stays monotonic.
pub trait IdSource {
    /// Produce the next identifier, strictly greater than `floor`.
    fn next_id(&mut self, floor: Option<&RunId>) -> RunId;
}

/// Wall-clock identifier source.
#[derive(Debug, Default)]
pub struct UtcIds;

impl IdSource for UtcIds {
    fn next_id(&mut self, floor: Option<&RunId>) -> RunId {
        let candidate = RunId::from_timestamp(Utc::now());
        match floor {
            Some(newest) if candidate <= *newest => newest.bumped(),
            _ => candidate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_ids_sort_chronologically() {
        let early = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 6).unwrap();
        assert!(RunId::from_timestamp(early) < RunId::from_timestamp(late));
    }

    #[test]
    fn id_formats_as_expected() {
        let at = Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 58).unwrap();
        assert_eq!(
            RunId::from_timestamp(at).as_str(),
            "run-20250630T235958.000Z"
        );
    }

    #[test]
    fn bumped_sorts_after_original() {
        let id = RunId::new("run-20250101T000000.000Z");
        assert!(id.bumped() > id);
        assert!(id.bumped().bumped() > id.bumped());
    }

    #[test]
    fn utc_source_respects_floor() {
        let mut source = UtcIds;
        // A floor far in the future forces the collision path.
        let floor = RunId::new("run-99990101T000000.000Z");
        let next = source.next_id(Some(&floor));
        assert!(next > floor);
    }

    #[test]
    fn utc_source_without_floor_uses_clock() {
        let mut source = UtcIds;
        let id = source.next_id(None);
        assert!(id.as_str().starts_with("run-"));
    }

    #[test]
    fn serde_is_transparent() {
        let id = RunId::new("run-20250101T000000.000Z");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"run-20250101T000000.000Z\"");
        let back: RunId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
