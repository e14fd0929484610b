//! Response schema for the PSN endpoints the pipeline consumes.
//!
//! The schema is fixed and validated at this boundary: a record missing the
//! fields the core needs is rejected here with a reason, rather than papered
//! over with dynamic lookups downstream.

use serde::Deserialize;

use trophy_atlas_core::{RawPlaytimeRecord, RawTrophyRecord, TierCounts};

/// One page of the game-list feed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleListPage {
    #[serde(default)]
    pub titles: Vec<TitleStats>,
    #[serde(default)]
    pub next_offset: Option<u32>,
    #[serde(default)]
    pub total_item_count: Option<u32>,
}

/// One title from the game-list feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleStats {
    #[serde(default)]
    pub name: Option<String>,
    /// ISO-8601 duration, e.g. "PT1192H44M48S".
    #[serde(default)]
    pub play_duration: Option<String>,
}

impl TitleStats {
    /// Convert into the core's raw playtime record.
    ///
    /// A missing or unparseable duration is logged and treated as zero, not
    /// as a fatal error; the registry builder then skips the record.
    pub fn into_playtime_record(self) -> RawPlaytimeRecord {
        let name = self.name.unwrap_or_default();
        let seconds = match self.play_duration.as_deref() {
            None => 0.0,
            Some(raw) => parse_play_duration(raw).unwrap_or_else(|| {
                log::warn!("unparseable play duration {:?} for {:?}; treating as zero", raw, name);
                0.0
            }),
        };
        RawPlaytimeRecord { name, seconds }
    }
}

/// One page of the trophy-title feed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrophyTitlePage {
    #[serde(default)]
    pub trophy_titles: Vec<TrophyTitle>,
    #[serde(default)]
    pub next_offset: Option<u32>,
    #[serde(default)]
    pub total_item_count: Option<u32>,
}

/// One title from the trophy-title feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrophyTitle {
    #[serde(default)]
    pub trophy_title_name: Option<String>,
    /// Single platform or comma-separated list, e.g. "PS5" or "PS4,PS5".
    #[serde(default)]
    pub trophy_title_platform: Option<String>,
    #[serde(default)]
    pub defined_trophies: Option<TierPayload>,
    #[serde(default)]
    pub earned_trophies: Option<TierPayload>,
}

/// Per-tier counts as they appear on the wire.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TierPayload {
    #[serde(default)]
    pub bronze: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub platinum: u32,
}

impl From<TierPayload> for TierCounts {
    fn from(p: TierPayload) -> Self {
        TierCounts::new(p.bronze, p.silver, p.gold, p.platinum)
    }
}

impl TrophyTitle {
    /// Validate and convert into the core's raw trophy record.
    ///
    /// Returns a reason string for malformed records so the caller can log
    /// and skip them without aborting the run.
    pub fn into_trophy_record(self) -> Result<RawTrophyRecord, String> {
        let name = self
            .trophy_title_name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| "trophy title without a name".to_string())?;
        let defined = self
            .defined_trophies
            .ok_or_else(|| format!("{}: missing defined trophy counts", name))?;
        let earned = self
            .earned_trophies
            .ok_or_else(|| format!("{}: missing earned trophy counts", name))?;

        Ok(RawTrophyRecord {
            platform: normalize_platforms(self.trophy_title_platform.as_deref()),
            name,
            earned: earned.into(),
            defined: defined.into(),
        })
    }
}

/// OAuth token endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// Profile endpoint response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfileResponse {
    pub profile: Profile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Profile {
    pub online_id: String,
}

/// Normalize a platform descriptor into a stable display string.
///
/// Multi-platform values are split, trimmed, sorted, and re-joined so the
/// same set always produces the same dedup key component. Absent or empty
/// values become "UNKNOWN".
pub fn normalize_platforms(raw: Option<&str>) -> String {
    let mut parts: Vec<&str> = raw
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return "UNKNOWN".to_string();
    }
    parts.sort_unstable();
    parts.dedup();
    parts.join(", ")
}

/// Parse an ISO-8601 duration of the form "PT(nH)(nM)(nS)" into seconds.
///
/// Only the hour/minute/second designators the game-list feed emits are
/// supported. Returns `None` on anything else.
pub fn parse_play_duration(raw: &str) -> Option<f64> {
    let body = raw.strip_prefix("PT")?;
    if body.is_empty() {
        return None;
    }

    let mut seconds = 0.0_f64;
    let mut number = String::new();
    for ch in body.chars() {
        match ch {
            '0'..='9' | '.' => number.push(ch),
            'H' | 'M' | 'S' => {
                let value: f64 = number.parse().ok()?;
                number.clear();
                seconds += match ch {
                    'H' => value * 3600.0,
                    'M' => value * 60.0,
                    _ => value,
                };
            }
            _ => return None,
        }
    }
    // A trailing number without a designator is malformed.
    if !number.is_empty() {
        return None;
    }

    Some(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_duration() {
        assert_eq!(parse_play_duration("PT1192H44M48S"), Some(4_293_888.0));
    }

    #[test]
    fn parses_partial_designators() {
        assert_eq!(parse_play_duration("PT15H"), Some(54_000.0));
        assert_eq!(parse_play_duration("PT30M"), Some(1_800.0));
        assert_eq!(parse_play_duration("PT12S"), Some(12.0));
        assert_eq!(parse_play_duration("PT1M30S"), Some(90.0));
    }

    #[test]
    fn rejects_malformed_durations() {
        assert_eq!(parse_play_duration(""), None);
        assert_eq!(parse_play_duration("PT"), None);
        assert_eq!(parse_play_duration("12H"), None);
        assert_eq!(parse_play_duration("PT12"), None);
        assert_eq!(parse_play_duration("PT12X"), None);
    }

    #[test]
    fn platform_lists_are_sorted_and_joined() {
        assert_eq!(normalize_platforms(Some("PS5")), "PS5");
        assert_eq!(normalize_platforms(Some("PS5,PS4")), "PS4, PS5");
        assert_eq!(normalize_platforms(Some(" PS5 , PS4 ")), "PS4, PS5");
        assert_eq!(normalize_platforms(Some("")), "UNKNOWN");
        assert_eq!(normalize_platforms(None), "UNKNOWN");
    }

    #[test]
    fn trophy_title_missing_name_is_rejected() {
        let title = TrophyTitle {
            trophy_title_name: None,
            trophy_title_platform: Some("PS5".to_string()),
            defined_trophies: Some(TierPayload::default()),
            earned_trophies: Some(TierPayload::default()),
        };
        assert!(title.into_trophy_record().is_err());
    }

    #[test]
    fn trophy_title_converts_counts() {
        let title = TrophyTitle {
            trophy_title_name: Some("Hades".to_string()),
            trophy_title_platform: Some("PS5".to_string()),
            defined_trophies: Some(TierPayload {
                bronze: 30,
                silver: 12,
                gold: 5,
                platinum: 1,
            }),
            earned_trophies: Some(TierPayload {
                bronze: 3,
                silver: 1,
                gold: 0,
                platinum: 0,
            }),
        };
        let record = title.into_trophy_record().expect("well-formed record");
        assert_eq!(record.name, "Hades");
        assert_eq!(record.platform, "PS5");
        assert_eq!(record.defined.total(), 48);
        assert_eq!(record.earned.total(), 4);
    }

    #[test]
    fn missing_duration_becomes_zero_seconds() {
        let stats = TitleStats {
            name: Some("Demo".to_string()),
            play_duration: None,
        };
        assert_eq!(stats.into_playtime_record().seconds, 0.0);
    }
}
