//! Reconciliation engine: joins trophy records against the playtime registry
//! and deduplicates by (normalized title, platform).
//!
//! The dedup map is a keyed reducer, not an accumulator: when two records
//! collide on a key, the winning candidate's fields are taken wholesale.
//! Nothing is merged field-by-field.

use std::collections::HashMap;

use crate::ghost::{DEFAULT_GHOST_THRESHOLD_SECONDS, filter_ghost_playtime};
use crate::normalize::normalize_title;
use crate::registry::PlaytimeRegistry;
use crate::runlog::{LogEntry, RunLog};
use crate::snapshot::{LibraryEntry, PlaytimeBlock, TrophyBlock, TrophyBreakdown};
use crate::trophies::{TierCounts, TrophyProgress};
use crate::util::format_duration;

/// A single title from the trophy feed.
///
/// Ephemeral: consumed by the engine and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTrophyRecord {
    /// Display name as reported by the feed.
    pub name: String,
    /// Platform descriptor (e.g., "PS5" or "PS4, PS5").
    pub platform: String,
    pub earned: TierCounts,
    pub defined: TierCounts,
}

/// Explicit configuration injected at the pipeline entry point.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Ghost heuristic threshold in seconds.
    pub ghost_threshold_seconds: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            ghost_threshold_seconds: DEFAULT_GHOST_THRESHOLD_SECONDS,
        }
    }
}

/// Identity of one canonical library entry.
///
/// The title component is the normalized key. When normalization strips a
/// title down to nothing, the raw title stands in, so two unrelated unusual
/// titles never collide under a shared empty bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DedupKey {
    title: String,
    platform: String,
}

/// Joins trophy records against the playtime registry, one record at a time.
///
/// No state persists across records beyond the dedup map. Execution is
/// strictly sequential; the map has a single logical owner for the whole run.
pub struct ReconciliationEngine<'a> {
    registry: &'a PlaytimeRegistry,
    options: PipelineOptions,
    merged: HashMap<DedupKey, LibraryEntry>,
}

impl<'a> ReconciliationEngine<'a> {
    pub fn new(registry: &'a PlaytimeRegistry, options: PipelineOptions) -> Self {
        Self {
            registry,
            options,
            merged: HashMap::new(),
        }
    }

    /// Process one trophy record: match playtime, aggregate trophies, apply
    /// the ghost filter, and merge into the dedup map.
    pub fn ingest(&mut self, record: RawTrophyRecord, log: &mut RunLog) {
        let norm_key = normalize_title(&record.name);
        let matched_seconds = self.registry.lookup(&norm_key);

        let progress = TrophyProgress::from_counts(record.earned, record.defined);

        // Ghost filtering happens here, per entry at merge time. The
        // registry's stored value and the lifetime total stay untouched.
        let seconds = filter_ghost_playtime(
            matched_seconds,
            progress.earned_total,
            self.options.ghost_threshold_seconds,
        );
        if seconds != matched_seconds {
            log::warn!(
                "ghost playtime detected: {} ({}) had {} with zero trophies",
                record.name,
                record.platform,
                format_duration(matched_seconds),
            );
            log.add(LogEntry::GhostZeroed {
                title: record.name.clone(),
                platform: record.platform.clone(),
                seconds_removed: matched_seconds,
            });
        }

        let candidate = LibraryEntry {
            title: record.name.clone(),
            platform: record.platform.clone(),
            is_platinum_earned: record.earned.platinum > 0,
            playtime: PlaytimeBlock::from_seconds(seconds),
            trophies: TrophyBlock {
                progress: format!("{:.1}%", progress.percent),
                breakdown: TrophyBreakdown {
                    plat: record.earned.platinum,
                    gold: record.earned.gold,
                    silver: record.earned.silver,
                    bronze: record.earned.bronze,
                },
            },
            progress_percent: progress.percent,
        };

        let title_key = if norm_key.is_empty() {
            log.add(LogEntry::EmptyKeyFallback {
                title: record.name.clone(),
            });
            record.name
        } else {
            norm_key
        };
        let key = DedupKey {
            title: title_key,
            platform: record.platform,
        };

        match self.merged.entry(key) {
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                if candidate_wins(&candidate, slot.get()) {
                    log.add(LogEntry::DuplicateReplaced {
                        title: candidate.title.clone(),
                        platform: candidate.platform.clone(),
                    });
                    slot.insert(candidate);
                } else {
                    log.add(LogEntry::DuplicateDropped {
                        title: candidate.title,
                        platform: candidate.platform,
                    });
                }
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
        }
    }

    /// Consume the engine and return the surviving entries, one per dedup key.
    pub fn finish(self) -> Vec<LibraryEntry> {
        self.merged.into_values().collect()
    }
}

/// Total-ordered replacement rule: strictly greater progress wins; on equal
/// progress, strictly greater playtime wins; otherwise the existing entry is
/// kept unchanged.
fn candidate_wins(candidate: &LibraryEntry, existing: &LibraryEntry) -> bool {
    if candidate.progress_percent > existing.progress_percent {
        return true;
    }
    candidate.progress_percent == existing.progress_percent
        && candidate.playtime.seconds > existing.playtime.seconds
}
