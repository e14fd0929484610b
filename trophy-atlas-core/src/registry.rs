//! Playtime registry built from the game-list feed.

use std::collections::HashMap;

use crate::normalize::normalize_title;

/// A single play-duration record from the game-list feed.
///
/// Ephemeral: consumed during registry construction and discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlaytimeRecord {
    /// Display name as reported by the feed.
    pub name: String,
    /// Play duration in seconds. Zero when the feed had no usable value.
    pub seconds: f64,
}

/// Normalized-key → max-duration mapping plus the unfiltered lifetime total.
///
/// Multiple raw records can share a normalized key (re-releases, regional
/// variants); the registry keeps the maximum so genuine playtime is never
/// undercounted. The lifetime total sums every positive duration regardless
/// of key collisions and is never revised by later ghost filtering: it
/// represents gross account activity, not per-title activity.
#[derive(Debug, Default)]
pub struct PlaytimeRegistry {
    durations: HashMap<String, f64>,
    lifetime_seconds: f64,
}

impl PlaytimeRegistry {
    /// Build the registry from raw feed records.
    ///
    /// Records with a non-positive duration are skipped entirely. Records
    /// whose title normalizes to an empty key still count toward the
    /// lifetime total but are excluded from the matching map.
    pub fn build(records: impl IntoIterator<Item = RawPlaytimeRecord>) -> Self {
        let mut registry = Self::default();

        for record in records {
            if record.seconds <= 0.0 {
                continue;
            }

            let key = normalize_title(&record.name);
            if !key.is_empty() {
                let slot = registry.durations.entry(key).or_insert(0.0);
                if record.seconds > *slot {
                    *slot = record.seconds;
                }
            }

            registry.lifetime_seconds += record.seconds;
        }

        registry
    }

    /// Look up the stored duration for a normalized key, defaulting to zero.
    ///
    /// An empty key is never a valid match target.
    pub fn lookup(&self, key: &str) -> f64 {
        if key.is_empty() {
            return 0.0;
        }
        self.durations.get(key).copied().unwrap_or(0.0)
    }

    /// Total of all raw durations, unfiltered and pre-dedup.
    pub fn lifetime_seconds(&self) -> f64 {
        self.lifetime_seconds
    }

    /// Number of distinct normalized keys with playtime.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}
