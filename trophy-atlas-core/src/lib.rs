//! Reconciliation core for the trophy-atlas library snapshot.
//!
//! This crate merges two independently-sourced views of a PSN account (the
//! game-list play-duration feed and the trophy-title feed) into a single
//! deduplicated library snapshot. It is pure, synchronous logic with no I/O;
//! fetching lives in `trophy-atlas-psn` and orchestration in the CLI.

pub mod ghost;
pub mod normalize;
pub mod reconcile;
pub mod registry;
pub mod runlog;
pub mod snapshot;
pub mod trophies;
pub mod util;

pub use ghost::{DEFAULT_GHOST_THRESHOLD_SECONDS, filter_ghost_playtime};
pub use normalize::normalize_title;
pub use reconcile::{PipelineOptions, RawTrophyRecord, ReconciliationEngine};
pub use registry::{PlaytimeRegistry, RawPlaytimeRecord};
pub use runlog::{LogEntry, RunLog, RunSummary};
pub use snapshot::{LibraryEntry, LibrarySnapshot, SnapshotMetadata, assemble_snapshot};
pub use trophies::{TierCounts, TrophyProgress};
pub use util::format_duration;
