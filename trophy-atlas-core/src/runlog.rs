//! Run log for one extraction.
//!
//! Collects the noteworthy events of a reconciliation pass (ghost zeroing,
//! duplicate resolution, fallback keys, skipped records) and writes them to a
//! plain-text log file alongside the snapshot.

use std::path::Path;

/// A single entry in the run log.
#[derive(Debug, Clone)]
pub enum LogEntry {
    /// Playtime zeroed by the ghost heuristic.
    GhostZeroed {
        title: String,
        platform: String,
        seconds_removed: f64,
    },
    /// A later record won the dedup comparison and replaced the stored entry.
    DuplicateReplaced { title: String, platform: String },
    /// A later record lost the dedup comparison and was dropped.
    DuplicateDropped { title: String, platform: String },
    /// Normalization produced an empty key; the raw title was used instead.
    EmptyKeyFallback { title: String },
    /// A malformed raw record was skipped.
    MalformedRecord { message: String },
    /// The playtime stage failed; the run continued trophies-only.
    PlaytimeStageFailed { message: String },
}

/// Collects run events and writes the log file.
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

/// Counts per entry kind, for the CLI summary block.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub ghosts_zeroed: usize,
    pub duplicates_replaced: usize,
    pub duplicates_dropped: usize,
    pub empty_key_fallbacks: usize,
    pub malformed_records: usize,
    pub playtime_stage_failed: bool,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for entry in &self.entries {
            match entry {
                LogEntry::GhostZeroed { .. } => summary.ghosts_zeroed += 1,
                LogEntry::DuplicateReplaced { .. } => summary.duplicates_replaced += 1,
                LogEntry::DuplicateDropped { .. } => summary.duplicates_dropped += 1,
                LogEntry::EmptyKeyFallback { .. } => summary.empty_key_fallbacks += 1,
                LogEntry::MalformedRecord { .. } => summary.malformed_records += 1,
                LogEntry::PlaytimeStageFailed { .. } => summary.playtime_stage_failed = true,
            }
        }
        summary
    }

    /// Write the log to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== Extraction Log ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(file, "Ghost playtime zeroed: {}", summary.ghosts_zeroed)?;
        writeln!(
            file,
            "Duplicates: {} replaced, {} dropped",
            summary.duplicates_replaced, summary.duplicates_dropped
        )?;
        writeln!(file, "Empty-key fallbacks: {}", summary.empty_key_fallbacks)?;
        writeln!(file, "Malformed records: {}", summary.malformed_records)?;
        if summary.playtime_stage_failed {
            writeln!(file, "Playtime stage: FAILED (trophies-only output)")?;
        }
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match entry {
                LogEntry::GhostZeroed {
                    title,
                    platform,
                    seconds_removed,
                } => {
                    writeln!(
                        file,
                        "[GHOST] {} ({}): {:.0}s removed",
                        title, platform, seconds_removed
                    )?;
                }
                LogEntry::DuplicateReplaced { title, platform } => {
                    writeln!(file, "[DUP] {} ({}) replaced by better record", title, platform)?;
                }
                LogEntry::DuplicateDropped { title, platform } => {
                    writeln!(file, "[DUP] {} ({}) duplicate dropped", title, platform)?;
                }
                LogEntry::EmptyKeyFallback { title } => {
                    writeln!(file, "[KEY] \"{}\" normalized to nothing; raw title used", title)?;
                }
                LogEntry::MalformedRecord { message } => {
                    writeln!(file, "[SKIP] {}", message)?;
                }
                LogEntry::PlaytimeStageFailed { message } => {
                    writeln!(file, "[WARN] playtime stage failed: {}", message)?;
                }
            }
        }

        Ok(())
    }
}
