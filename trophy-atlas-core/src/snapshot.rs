//! Final snapshot assembly and its serialized shape.
//!
//! The snapshot is the terminal, immutable artifact of a run. Its JSON shape
//! is a contract with the downstream visualization step; field names here
//! must not change without coordinating with it.

use serde::Serialize;

use crate::util::format_duration;

/// Playtime for one library entry, in the three forms consumers want.
#[derive(Debug, Clone, Serialize)]
pub struct PlaytimeBlock {
    pub seconds: f64,
    pub hours: f64,
    pub formatted: String,
}

impl PlaytimeBlock {
    /// Build all three representations from a raw second count.
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            seconds: round2(seconds),
            hours: round2(seconds / 3600.0),
            formatted: format_duration(seconds),
        }
    }
}

/// Earned trophy counts by tier.
#[derive(Debug, Clone, Serialize)]
pub struct TrophyBreakdown {
    pub plat: u32,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

/// User-facing trophy block: formatted progress plus the breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct TrophyBlock {
    /// Formatted as "NN.N%".
    pub progress: String,
    pub breakdown: TrophyBreakdown,
}

/// One merged, user-facing library record.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryEntry {
    pub title: String,
    pub platform: String,
    pub is_platinum_earned: bool,
    pub playtime: PlaytimeBlock,
    pub trophies: TrophyBlock,
    /// Numeric progress kept for merge tie-breaking only; stripped from the
    /// serialized entry.
    #[serde(skip)]
    pub progress_percent: f64,
}

/// Aggregate metadata for the run.
#[derive(Debug, Serialize)]
pub struct SnapshotMetadata {
    pub user: String,
    pub total_playtime_seconds: f64,
    pub total_playtime_formatted: String,
    pub total_platinums: usize,
    pub total_games_unique: usize,
}

/// The terminal output artifact for one extraction run.
#[derive(Debug, Serialize)]
pub struct LibrarySnapshot {
    pub metadata: SnapshotMetadata,
    pub platinum_collection: Vec<LibraryEntry>,
    pub full_library: Vec<LibraryEntry>,
}

/// Sort, partition, and wrap the merged entries into the final snapshot.
///
/// Both sequences are sorted by title with plain case-sensitive `str`
/// ordering; titles are emitted as provided, with no re-normalization for
/// display. `lifetime_seconds` is the registry's unfiltered total and is
/// reported as-is.
pub fn assemble_snapshot(
    user: &str,
    lifetime_seconds: f64,
    entries: Vec<LibraryEntry>,
) -> LibrarySnapshot {
    let mut full_library = entries;
    full_library.sort_by(|a, b| a.title.cmp(&b.title));

    let platinum_collection: Vec<LibraryEntry> = full_library
        .iter()
        .filter(|e| e.is_platinum_earned)
        .cloned()
        .collect();

    LibrarySnapshot {
        metadata: SnapshotMetadata {
            user: user.to_string(),
            total_playtime_seconds: lifetime_seconds,
            total_playtime_formatted: format_duration(lifetime_seconds),
            total_platinums: platinum_collection.len(),
            total_games_unique: full_library.len(),
        },
        platinum_collection,
        full_library,
    }
}

/// Round to two decimal places for the serialized playtime fields.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
