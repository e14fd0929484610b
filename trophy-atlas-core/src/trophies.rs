//! Trophy tier aggregation.

/// Per-tier trophy counts as reported by the trophy feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub bronze: u32,
    pub silver: u32,
    pub gold: u32,
    pub platinum: u32,
}

impl TierCounts {
    pub fn new(bronze: u32, silver: u32, gold: u32, platinum: u32) -> Self {
        Self {
            bronze,
            silver,
            gold,
            platinum,
        }
    }

    /// Sum across all four tiers.
    pub fn total(&self) -> u32 {
        self.bronze + self.silver + self.gold + self.platinum
    }
}

/// Earned/defined totals and completion percentage for one title.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrophyProgress {
    pub earned_total: u32,
    pub defined_total: u32,
    /// Percentage rounded to one decimal place; used for merge tie-breaking.
    pub percent: f64,
}

impl TrophyProgress {
    /// Compute totals and progress from earned and defined tier counts.
    pub fn from_counts(earned: TierCounts, defined: TierCounts) -> Self {
        let earned_total = earned.total();
        let defined_total = defined.total();
        Self {
            earned_total,
            defined_total,
            percent: safe_percent(earned_total, defined_total),
        }
    }
}

/// `round(100 * earned / total, 1)`, or 0.0 for an empty trophy set.
fn safe_percent(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (f64::from(numerator) / f64::from(denominator) * 1000.0).round() / 10.0
}
